use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use log::{debug, info};

use super::format::tiff::DEFAULT_MAX_DIRECTORIES;
use super::types::error::{ImetaError, Result};
use super::types::filetypes::{FileType, ImageFile, Jpeg, ReadSeek, Tiff};
use super::types::models::Metadata;

/// Decode settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Record a failing APP section in [`Metadata::warnings`] and keep
    /// scanning, instead of aborting the whole decode.
    pub recover_sections: bool,
    /// Upper bound on directories visited in one decode.
    pub max_directories: usize,
    /// Hand XMP packets to the text-document decoder.
    pub decode_xmp: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            recover_sections: false,
            max_directories: DEFAULT_MAX_DIRECTORIES,
            decode_xmp: true,
        }
    }
}

/// Ordered list of container recognizers, fixed at construction.
pub struct Registry {
    file_types: Vec<Box<dyn FileType>>,
}

impl Registry {
    /// Recognizers are tried in the order given.
    pub fn new(file_types: Vec<Box<dyn FileType>>) -> Self {
        Self { file_types }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.file_types.iter().map(|ft| ft.name()).collect()
    }

    /// Tries each recognizer from the start of `src`; the first match wins.
    pub fn detect(&self, src: &mut dyn ReadSeek) -> Result<Option<Box<dyn ImageFile>>> {
        for file_type in &self.file_types {
            src.seek(SeekFrom::Start(0))?;
            if let Some(image_file) = file_type.detect(src) {
                debug!("Detected {} container", file_type.name());
                return Ok(Some(image_file));
            }
        }
        Ok(None)
    }
}

impl Default for Registry {
    /// Segment-framed containers first, then flat directory containers.
    fn default() -> Self {
        Self::new(vec![Box::new(Jpeg), Box::new(Tiff)])
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Registry").field("file_types", &self.names()).finish()
    }
}

/// The entry point for decoding image metadata.
///
/// Each call owns its result; a reader holds only its registry and
/// options and can be reused across any number of sources.
#[derive(Debug, Default)]
pub struct ImetaReader {
    registry: Registry,
    options: ReadOptions,
}

impl ImetaReader {
    pub fn new(registry: Registry, options: ReadOptions) -> Self {
        Self { registry, options }
    }

    /// A reader with the default registry and the given options.
    pub fn with_options(options: ReadOptions) -> Self {
        Self::new(Registry::default(), options)
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Detects the container and decodes all of its metadata.
    ///
    /// # Errors
    /// Returns an error if:
    /// - No recognizer matches (`UnrecognizedFormat`)
    /// - The container framing is malformed
    /// - An embedded section fails to decode and recovery is disabled
    pub fn read<R: Read + Seek>(&self, src: &mut R) -> Result<Metadata> {
        let image_file = self
            .registry
            .detect(src)?
            .ok_or(ImetaError::UnrecognizedFormat)?;

        let mut meta = Metadata::new(image_file.format());
        src.seek(SeekFrom::Start(0))?;
        image_file.read_meta(&mut meta, src, &self.options)?;

        info!(
            "Decoded {} metadata: {} groups, {} resource blocks",
            meta.format,
            meta.groups().count(),
            meta.resources.len()
        );
        Ok(meta)
    }

    /// Opens and decodes an image file.
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<Metadata> {
        let path = path.as_ref();
        info!("Opening image file: {}", path.display());
        let mut file = BufReader::new(File::open(path)?);
        self.read(&mut file)
    }

    /// Decodes an in-memory image.
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<Metadata> {
        self.read(&mut Cursor::new(bytes))
    }
}

/// Decodes `src` with the default reader.
pub fn read<R: Read + Seek>(src: &mut R) -> Result<Metadata> {
    ImetaReader::default().read(src)
}

/// Decodes the file at `path` with the default reader.
pub fn read_from_file(path: impl AsRef<Path>) -> Result<Metadata> {
    ImetaReader::default().read_path(path)
}

/// Decodes an in-memory image with the default reader.
pub fn read_from_buf(bytes: &[u8]) -> Result<Metadata> {
    ImetaReader::default().read_bytes(bytes)
}
