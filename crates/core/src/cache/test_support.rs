//! Fixtures shared by the cache tests.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{FetchError, Fetched, Fetcher};

pub(crate) fn png_bytes() -> Vec<u8> {
    let image = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 40, 40]));
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Serves canned bodies and records every identifier it was asked for.
#[derive(Default)]
pub(crate) struct StubFetcher {
    bodies: HashMap<String, Vec<u8>>,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, id: &str, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(id.to_string(), body.into());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn calls_for(&self, id: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == id).count()
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, id: &str) -> Result<Fetched, FetchError> {
        self.calls.lock().unwrap().push(id.to_string());
        match self.bodies.get(id) {
            Some(body) => Ok(Fetched::new(body.clone())),
            None => Err(FetchError::NotFound { id: id.to_string() }),
        }
    }
}
