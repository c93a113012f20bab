//! In-memory `.docx` document handle
//!
//! A `.docx` file is a zip archive; the layout lives in the main document
//! part (normally `word/document.xml`). The handle keeps the original archive
//! bytes, parses the main part into an [`Element`] tree for in-place edits,
//! and on save copies every other entry through unchanged.

mod io;
pub mod xml;

pub use io::{load_docx, save_docx};
pub use xml::{Element, Node};

use crate::types::MutationError;
use std::io::{Cursor, Read, Seek, Write};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Part used when the package relationships don't name one
pub const DEFAULT_MAIN_PART: &str = "word/document.xml";

const PACKAGE_RELS: &str = "_rels/.rels";
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";

#[derive(Debug, Clone)]
pub struct DocxDocument {
    source: Vec<u8>,
    main_part: String,
    document: Element,
}

impl DocxDocument {
    /// Parse a `.docx` archive held in memory
    pub fn from_bytes(source: Vec<u8>) -> Result<Self, MutationError> {
        let mut archive = ZipArchive::new(Cursor::new(source.as_slice()))?;
        let main_part = locate_main_part(&mut archive)?;
        let xml = read_entry(&mut archive, &main_part)?;
        let document = xml::parse(&xml).map_err(|e| MutationError::Xml {
            part: main_part.clone(),
            message: e.to_string(),
        })?;
        drop(archive);

        Ok(Self {
            source,
            main_part,
            document,
        })
    }

    /// Serialize back to archive bytes, replacing only the main part
    pub fn to_bytes(&self) -> Result<Vec<u8>, MutationError> {
        let xml = self.document.to_xml().map_err(|e| MutationError::Xml {
            part: self.main_part.clone(),
            message: e.to_string(),
        })?;

        let mut archive = ZipArchive::new(Cursor::new(self.source.as_slice()))?;
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for index in 0..archive.len() {
            let file = archive.by_index_raw(index)?;
            if file.name() == self.main_part {
                drop(file);
                writer.start_file(self.main_part.as_str(), options)?;
                writer.write_all(&xml)?;
            } else {
                writer.raw_copy_file(file)?;
            }
        }

        Ok(writer.finish()?.into_inner())
    }

    /// Archive path of the main document part
    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    /// Root `w:document` element
    pub fn document(&self) -> &Element {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Element {
        &mut self.document
    }

    pub fn body(&self) -> Option<&Element> {
        self.document.child("w:body")
    }

    pub fn body_mut(&mut self) -> Option<&mut Element> {
        self.document.child_mut("w:body")
    }
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, MutationError> {
    let mut file = archive.by_name(name).map_err(|e| match e {
        ZipError::FileNotFound => MutationError::MissingPart(name.to_string()),
        other => MutationError::Archive(other),
    })?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(content)
}

/// Follow the package `officeDocument` relationship to the main part
fn locate_main_part<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String, MutationError> {
    let rels = match read_entry(archive, PACKAGE_RELS) {
        Ok(rels) => rels,
        Err(MutationError::MissingPart(_)) => return Ok(DEFAULT_MAIN_PART.to_string()),
        Err(e) => return Err(e),
    };

    let root = xml::parse(&rels).map_err(|e| MutationError::Xml {
        part: PACKAGE_RELS.to_string(),
        message: e.to_string(),
    })?;

    let target = root
        .elements()
        .filter(|el| el.name == "Relationship")
        .find(|el| {
            el.attr("Type")
                .is_some_and(|kind| kind.ends_with(OFFICE_DOCUMENT_REL))
        })
        .and_then(|el| el.attr("Target"))
        .map(|target| target.trim_start_matches('/').to_string());

    Ok(target.unwrap_or_else(|| DEFAULT_MAIN_PART.to_string()))
}
