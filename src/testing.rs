use crate::setup::fetch::{FetchError, Transport};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Cursor, Read, Write};
use std::path::Path;

/// In-memory transport that records every url it is asked for.
#[derive(Default)]
pub struct MemoryTransport {
    bodies: HashMap<String, Vec<u8>>,
    broken: Vec<String>,
    requests: RefCell<Vec<String>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), body.to_vec());
        self
    }

    /// Answers `url` with a body that fails on the first read.
    pub fn serve_broken(mut self, url: &str) -> Self {
        self.broken.push(url.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

struct BrokenBody;

impl Read for BrokenBody {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"))
    }
}

impl Transport for MemoryTransport {
    fn get(&self, url: &str) -> Result<Box<dyn Read>, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        if self.broken.iter().any(|u| u == url) {
            return Ok(Box::new(BrokenBody));
        }
        match self.bodies.get(url) {
            Some(body) => Ok(Box::new(Cursor::new(body.clone()))),
            None => Err(FetchError::Status(url.to_string(), 404)),
        }
    }
}

pub fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    zip_with(entries, zip::CompressionMethod::Deflated)
}

/// Uncompressed entries, so payload bytes appear verbatim in the archive.
pub fn build_stored_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    zip_with(entries, zip::CompressionMethod::Stored)
}

fn zip_with(entries: &[(&str, &[u8])], method: zip::CompressionMethod) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(vec![]));
    let options = zip::write::FileOptions::default().compression_method(method);
    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    std::fs::write(path, build_zip(entries)).unwrap();
}
