use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::content::text::slugify;
use crate::domain::post::{NewPost, PostUpdate};
use crate::domain::types::{AuthorName, ImageUrl, PostTitle, Slug};
use crate::forms::import_export::{POST_HEADERS, ParsedPostRow};
use crate::repository::{PostListQuery, PostReader, PostWriter};

use super::{ServiceError, ServiceResult};

/// Row-level upload error used for UI reporting.
#[derive(Debug, Clone, Serialize)]
pub struct UploadRowError {
    pub row_number: usize,
    pub title: Option<String>,
    pub message: String,
}

/// Aggregated upload outcome report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadReport {
    pub total_rows: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<UploadRowError>,
}

impl UploadReport {
    pub fn with_total(total_rows: usize) -> Self {
        Self {
            total_rows,
            ..Self::default()
        }
    }

    pub fn push_error(
        &mut self,
        row_number: usize,
        title: Option<String>,
        message: impl Into<String>,
    ) {
        self.skipped += 1;
        self.errors.push(UploadRowError {
            row_number,
            title,
            message: message.into(),
        });
    }
}

/// Import parsed spreadsheet rows. An existing slug means update; a fresh
/// one means create. Bad rows are reported, not fatal.
pub fn import_posts<R>(rows: Vec<ParsedPostRow>, repo: &R) -> UploadReport
where
    R: PostReader + PostWriter,
{
    let mut report = UploadReport::with_total(rows.len());

    for row in rows {
        let row_number = row.row_number;
        let row_title = Some(row.title.clone());
        match import_row(row, repo) {
            Ok(RowOutcome::Created) => report.created += 1,
            Ok(RowOutcome::Updated) => report.updated += 1,
            Err(message) => report.push_error(row_number, row_title, message),
        }
    }

    report
}

enum RowOutcome {
    Created,
    Updated,
}

fn import_row<R>(row: ParsedPostRow, repo: &R) -> Result<RowOutcome, String>
where
    R: PostReader + PostWriter,
{
    let title = PostTitle::new(row.title).map_err(|e| e.to_string())?;
    let author = AuthorName::new(row.author).map_err(|e| e.to_string())?;
    if row.content.is_empty() {
        return Err("content cannot be empty".to_string());
    }
    let pub_date = row
        .pub_date
        .as_deref()
        .map(|value| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_err(|_| format!("pub_date must be ISO 8601 (YYYY-MM-DD), got: {value}"))
        })
        .transpose()?;
    let image_url = row
        .image_url
        .map(ImageUrl::new)
        .transpose()
        .map_err(|e| e.to_string())?;

    let slug = Slug::new(slugify(title.as_str()))
        .map_err(|_| "title does not produce a usable slug".to_string())?;

    let existing = repo
        .get_post_by_slug(&slug)
        .map_err(|e| format!("lookup failed: {e}"))?;

    match existing {
        Some(post) => {
            let update = PostUpdate {
                title: Some(title),
                author: Some(author),
                description: row.description,
                image_url,
                image_alt: row.image_alt,
                pub_date,
                tags: Some(row.tags),
                content: Some(row.content),
            };
            repo.update_post(post.id, &update)
                .map_err(|e| format!("update failed: {e}"))?;
            Ok(RowOutcome::Updated)
        }
        None => {
            let new_post = NewPost {
                title,
                author,
                description: row.description,
                image_url,
                image_alt: row.image_alt,
                pub_date: pub_date.unwrap_or_else(|| chrono::Utc::now().date_naive()),
                tags: row.tags,
                content: row.content,
                slug,
            };
            repo.create_post(&new_post)
                .map_err(|e| format!("create failed: {e}"))?;
            Ok(RowOutcome::Created)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFormat {
    Csv,
    Xlsx,
}

impl TryFrom<&str> for DownloadFormat {
    type Error = DownloadError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(DownloadError::InvalidFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownloadFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid download format: {0}")]
    InvalidFormat(String),
    #[error("failed to render csv")]
    CsvRender,
    #[error("failed to render xlsx")]
    XlsxRender,
}

/// Export every post as a spreadsheet in the requested format.
pub fn download_posts<R>(format: DownloadFormat, repo: &R) -> ServiceResult<DownloadFile>
where
    R: PostReader,
{
    let posts = match repo.list_posts(PostListQuery::default()) {
        Ok((_total, posts)) => posts,
        Err(e) => {
            log::error!("Failed to list posts for download: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let rows: Vec<Vec<String>> = posts
        .into_iter()
        .map(|post| {
            vec![
                post.title.to_string(),
                post.author.to_string(),
                post.description.unwrap_or_default(),
                post.pub_date.to_string(),
                post.tags.join(", "),
                post.content,
                post.image_url.map(String::from).unwrap_or_default(),
                post.image_alt.unwrap_or_default(),
            ]
        })
        .collect();

    render_download_file("posts", format, &POST_HEADERS, &rows).map_err(|e| {
        log::error!("Failed to render posts download: {e}");
        ServiceError::Internal
    })
}

pub fn render_download_file(
    base_name: &str,
    format: DownloadFormat,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<DownloadFile, DownloadError> {
    match format {
        DownloadFormat::Csv => {
            let mut writer = csv::Writer::from_writer(vec![]);
            writer
                .write_record(headers)
                .map_err(|_| DownloadError::CsvRender)?;
            for row in rows {
                let escaped_row: Vec<String> =
                    row.iter().map(|value| escape_csv_cell(value)).collect();
                writer
                    .write_record(&escaped_row)
                    .map_err(|_| DownloadError::CsvRender)?;
            }
            let bytes = writer.into_inner().map_err(|_| DownloadError::CsvRender)?;
            Ok(DownloadFile {
                file_name: format!("{base_name}.csv"),
                content_type: "text/csv; charset=utf-8",
                bytes,
            })
        }
        DownloadFormat::Xlsx => {
            let mut workbook = rust_xlsxwriter::Workbook::new();
            let worksheet = workbook.add_worksheet();

            for (col_idx, header) in headers.iter().enumerate() {
                worksheet
                    .write_string(0, col_idx as u16, *header)
                    .map_err(|_| DownloadError::XlsxRender)?;
            }

            for (row_idx, row) in rows.iter().enumerate() {
                let sheet_row = (row_idx + 1) as u32;
                for (col_idx, value) in row.iter().enumerate() {
                    worksheet
                        .write_string(sheet_row, col_idx as u16, value)
                        .map_err(|_| DownloadError::XlsxRender)?;
                }
            }

            let bytes = workbook
                .save_to_buffer()
                .map_err(|_| DownloadError::XlsxRender)?;
            Ok(DownloadFile {
                file_name: format!("{base_name}.xlsx"),
                content_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                bytes,
            })
        }
    }
}

fn escape_csv_cell(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some('=' | '+' | '-' | '@') => format!("'{value}"),
        _ => value.to_string(),
    }
}
