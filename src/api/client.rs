use super::types::{
    ConvertRequest, ConvertResponse, DownloadAllRequest, FfmpegStatus, LanguageList,
    UploadResponse,
};
use crate::error::ApiError;
use crate::upload::FileSource;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ZIP_FILE_NAME: &str = "converted_files.zip";

/// HTTP client for the conversion backend.
#[derive(Clone, Debug)]
pub struct ConverterClient {
    http: Client,
    base_url: Url,
}

impl ConverterClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn upload(&self, source: &FileSource) -> Result<UploadResponse, ApiError> {
        let name = source.name();
        let bytes = source.read().await?;
        tracing::debug!("Uploading {} ({} bytes)", name, bytes.len());

        let form = Form::new().part("file", Part::bytes(bytes).file_name(name));
        let response = self
            .http
            .post(self.endpoint(&["api", "upload"])?)
            .multipart(form)
            .send()
            .await?;

        let response = ensure_success(response)?;
        Ok(response.json::<UploadResponse>().await?)
    }

    /// Returns the result file name on success.
    pub async fn convert(&self, server_filename: &str, target_format: &str) -> Result<String, ApiError> {
        let request = ConvertRequest {
            file_path: server_filename,
            target_format,
            quality: "high",
        };
        let response = self
            .http
            .post(self.endpoint(&["api", "convert"])?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed: ConvertResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => return Err(ApiError::Status(status.as_u16())),
            Err(e) => return Err(ApiError::InvalidResponse(e.to_string())),
        };

        match parsed {
            ConvertResponse {
                success: true,
                filename: Some(filename),
                ..
            } => Ok(filename),
            ConvertResponse { success: true, .. } => Err(ApiError::InvalidResponse(
                "conversion succeeded without a file name".to_string(),
            )),
            ConvertResponse { error, .. } => Err(ApiError::Backend(
                error.unwrap_or_else(|| "Conversion failed".to_string()),
            )),
        }
    }

    /// Saves one converted file into `dest_dir` and returns its path.
    pub async fn download(&self, filename: &str, dest_dir: &Path) -> Result<PathBuf, ApiError> {
        let response = self
            .http
            .get(self.endpoint(&["api", "download", filename])?)
            .send()
            .await?;
        let bytes = ensure_success(response)?.bytes().await?;

        let local_name = Path::new(filename)
            .file_name()
            .ok_or_else(|| ApiError::InvalidResponse(format!("bad file name: {filename}")))?;
        let path = dest_dir.join(local_name);
        tokio::fs::create_dir_all(dest_dir).await?;
        tokio::fs::write(&path, &bytes).await?;
        tracing::info!("Downloaded {} to {}", filename, path.display());
        Ok(path)
    }

    /// Asks the backend to zip `filenames` and saves the archive into `dest_dir`.
    pub async fn download_all(
        &self,
        filenames: &[String],
        dest_dir: &Path,
    ) -> Result<PathBuf, ApiError> {
        let response = self
            .http
            .post(self.endpoint(&["api", "download-all"])?)
            .json(&DownloadAllRequest { filenames })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::ZipCreation(status.as_u16()));
        }
        let bytes = response.bytes().await?;

        let path = dest_dir.join(ZIP_FILE_NAME);
        tokio::fs::create_dir_all(dest_dir).await?;
        tokio::fs::write(&path, &bytes).await?;
        tracing::info!("Saved {} files to {}", filenames.len(), path.display());
        Ok(path)
    }

    pub async fn check_ffmpeg(&self) -> Result<bool, ApiError> {
        let response = self
            .http
            .get(self.endpoint(&["api", "check-ffmpeg"])?)
            .send()
            .await?;
        let status: FfmpegStatus = ensure_success(response)?.json().await?;
        Ok(status.installed)
    }

    pub async fn languages(&self) -> Result<Vec<String>, ApiError> {
        let response = self
            .http
            .get(self.endpoint(&["api", "languages"])?)
            .send()
            .await?;
        let list: LanguageList = ensure_success(response)?.json().await?;
        Ok(list.languages)
    }

    pub async fn locale(&self, lang: &str) -> Result<serde_json::Value, ApiError> {
        let file = format!("{lang}.json");
        let response = self
            .http
            .get(self.endpoint(&["static", "locales", &file])?)
            .send()
            .await?;
        Ok(ensure_success(response)?.json().await?)
    }
}

fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status(status.as_u16()))
    }
}
