use std::path::Path;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use calamine::{Data, Reader, open_workbook_auto};
use thiserror::Error;

/// Column layout shared by uploads and downloads.
pub const POST_HEADERS: [&str; 8] = [
    "title",
    "author",
    "description",
    "pub_date",
    "tags",
    "content",
    "image_url",
    "image_alt",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Csv,
    Xlsx,
}

impl TryFrom<&str> for UploadFormat {
    type Error = UploadParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(UploadParseError::InvalidFormat(other.to_string())),
        }
    }
}

/// Multipart body accepted by `POST /v1/posts/import`.
#[derive(MultipartForm)]
pub struct UploadImportForm {
    #[multipart(limit = "10MB")]
    pub file: TempFile,
    pub format: Text<String>,
}

/// One spreadsheet row, still untyped. Validation happens per-row during
/// import so a bad row is reported, not fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPostRow {
    /// 1-based spreadsheet row number, counting the header.
    pub row_number: usize,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub pub_date: Option<String>,
    pub tags: Vec<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
}

#[derive(Debug, Error)]
pub enum UploadParseError {
    #[error("invalid upload format: {0}")]
    InvalidFormat(String),
    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to read workbook: {0}")]
    Xlsx(#[from] calamine::Error),
    #[error("upload contains no rows")]
    Empty,
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
}

/// Parse an uploaded spreadsheet into rows, dispatching on format.
pub fn parse_posts_upload(
    path: &Path,
    format: UploadFormat,
) -> Result<Vec<ParsedPostRow>, UploadParseError> {
    match format {
        UploadFormat::Csv => parse_csv(path),
        UploadFormat::Xlsx => parse_xlsx(path),
    }
}

struct ColumnMap {
    title: usize,
    author: usize,
    content: usize,
    description: Option<usize>,
    pub_date: Option<usize>,
    tags: Option<usize>,
    image_url: Option<usize>,
    image_alt: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &[String]) -> Result<Self, UploadParseError> {
        let required = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(UploadParseError::MissingColumn(name))
        };
        let optional = |name: &str| headers.iter().position(|h| h == name);

        Ok(Self {
            title: required("title")?,
            author: required("author")?,
            content: required("content")?,
            description: optional("description"),
            pub_date: optional("pub_date"),
            tags: optional("tags"),
            image_url: optional("image_url"),
            image_alt: optional("image_alt"),
        })
    }

    fn row(&self, row_number: usize, cells: &[String]) -> ParsedPostRow {
        let cell = |idx: usize| cells.get(idx).cloned().unwrap_or_default();
        let opt_cell = |idx: Option<usize>| idx.map(&cell).filter(|v: &String| !v.is_empty());

        ParsedPostRow {
            row_number,
            title: cell(self.title),
            author: cell(self.author),
            content: cell(self.content),
            description: opt_cell(self.description),
            pub_date: opt_cell(self.pub_date),
            tags: opt_cell(self.tags)
                .map(|value| split_tags(&value))
                .unwrap_or_default(),
            image_url: opt_cell(self.image_url),
            image_alt: opt_cell(self.image_alt),
        }
    }
}

/// Tags travel as a comma-separated cell.
fn split_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn parse_csv(path: &Path) -> Result<Vec<ParsedPostRow>, UploadParseError> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let cells: Vec<String> = record.iter().map(|cell| cell.trim().to_string()).collect();
        rows.push(columns.row(index + 2, &cells));
    }

    Ok(rows)
}

fn parse_xlsx(path: &Path) -> Result<Vec<ParsedPostRow>, UploadParseError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(UploadParseError::Empty)??;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = sheet_rows
        .next()
        .ok_or(UploadParseError::Empty)?
        .iter()
        .map(|cell| cell_to_string(cell).trim().to_lowercase())
        .collect();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut rows = Vec::new();
    for (index, sheet_row) in sheet_rows.enumerate() {
        let cells: Vec<String> = sheet_row
            .iter()
            .map(|cell| cell_to_string(cell).trim().to_string())
            .collect();
        rows.push(columns.row(index + 2, &cells));
    }

    Ok(rows)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        _ => cell.to_string(),
    }
}
