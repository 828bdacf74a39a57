//! Tesseract OCR engine

use super::OcrEngine;
use crate::config::OcrConfig;
use crate::error::{LicaError, Result};
use async_trait::async_trait;
use image::ImageReader;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Runs the tesseract binary against an image file
pub struct TesseractOcr {
    command: PathBuf,
    language: Option<String>,
}

impl TesseractOcr {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            language: None,
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self {
            command: config.tesseract_cmd.clone(),
            language: config.language.clone(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Arguments passed to tesseract for one image
    fn args(&self, path: &Path) -> Vec<String> {
        let mut args = vec![path.to_string_lossy().to_string(), "stdout".to_string()];
        if let Some(ref lang) = self.language {
            args.push("-l".to_string());
            args.push(lang.clone());
        }
        args
    }

    /// Decode the image so corrupt files fail before tesseract is spawned
    ///
    /// The format is sniffed from the file content; upload paths often have
    /// no extension.
    async fn check_image(path: &Path) -> Result<()> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || -> Result<()> {
            ImageReader::open(&path)?.with_guessed_format()?.decode()?;
            Ok(())
        })
        .await
        .map_err(|e| LicaError::Ocr(format!("image decode task failed: {}", e)))?
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, path: &Path) -> Result<String> {
        Self::check_image(path).await?;

        let output = Command::new(&self.command)
            .args(self.args(path))
            .output()
            .await
            .map_err(|e| {
                LicaError::Ocr(format!(
                    "failed to run tesseract at {}: {}",
                    self.command.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LicaError::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn engine_name(&self) -> &str {
        "tesseract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_png(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("blank.png");
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([255, 255, 255]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_args_without_language() {
        let ocr = TesseractOcr::new("tesseract");
        assert_eq!(ocr.args(Path::new("a.png")), vec!["a.png", "stdout"]);
    }

    #[test]
    fn test_args_with_language() {
        let ocr = TesseractOcr::new("tesseract").with_language("eng");
        assert_eq!(
            ocr.args(Path::new("a.png")),
            vec!["a.png", "stdout", "-l", "eng"]
        );
    }

    #[tokio::test]
    async fn test_corrupt_image_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let ocr = TesseractOcr::new("tesseract");
        let err = ocr.recognize(&path).await.unwrap_err();
        assert!(matches!(err, LicaError::Image(_)));
    }

    #[tokio::test]
    async fn test_image_without_extension_is_decoded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("upload-1234");
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([255, 255, 255]));
        img.save_with_format(&path, image::ImageFormat::Png).unwrap();

        // Decoding succeeds, so the failure comes from the missing binary
        let ocr = TesseractOcr::new(dir.path().join("no-such-tesseract"));
        let err = ocr.recognize(&path).await.unwrap_err();
        assert!(matches!(err, LicaError::Ocr(msg) if msg.contains("failed to run tesseract")));
    }

    #[tokio::test]
    async fn test_missing_binary_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir);

        let ocr = TesseractOcr::new(dir.path().join("no-such-tesseract"));
        let err = ocr.recognize(&path).await.unwrap_err();
        assert!(matches!(err, LicaError::Ocr(msg) if msg.contains("failed to run tesseract")));
    }
}
