use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Result, SubterfugeError};
use crate::media::{SubtitleExtractor, SubtitleExtractorFactory};
use crate::output::{normalize_language_code, write_translated, OutputMode};
use crate::progress::ProgressReporter;
use crate::subtitle::read_srt;
use crate::translate::{BatchCoordinator, BatchOptions, GoogleTranslator, AUTO_DETECT};

/// Languages and placement for one translation run
#[derive(Debug, Clone)]
pub struct TranslateRequest {
    pub from: String,
    pub to: String,
    pub mode: OutputMode,
    /// Translate even when source and target resolve to the same language
    pub force: bool,
}

/// Outcome of translating a directory
#[derive(Debug, Default)]
pub struct DirectorySummary {
    pub translated: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

pub struct Workflow {
    coordinator: BatchCoordinator,
    extractor: Box<dyn SubtitleExtractor>,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let translator = GoogleTranslator::new(&config.translate)?;
        let coordinator = BatchCoordinator::new(
            Box::new(translator),
            BatchOptions::from(&config.translate),
        )?;
        let extractor = SubtitleExtractorFactory::create_extractor(config.media.clone());

        Ok(Self {
            coordinator,
            extractor,
        })
    }

    pub fn with_components(coordinator: BatchCoordinator, extractor: Box<dyn SubtitleExtractor>) -> Self {
        Self {
            coordinator,
            extractor,
        }
    }

    /// Translate one SRT file and place the result next to it
    pub async fn translate_file<P: AsRef<Path>>(
        &self,
        input_path: P,
        request: &TranslateRequest,
        progress: &dyn ProgressReporter,
    ) -> Result<PathBuf> {
        let input_path = input_path.as_ref();
        let cues = read_srt(input_path).await?;

        // An explicit source language is known up front; auto waits for detection
        check_languages_differ(&request.from, &request.to, request.force)?;

        info!("Translating from {} to {}", request.from, request.to);
        let document = self
            .coordinator
            .translate_document(&cues, &request.from, &request.to, progress)
            .await?;

        let source_lang = resolve_source_language(&request.from, document.detected_language.as_deref());
        if let Some(detected) = &document.detected_language {
            info!("Detected source language: {}", detected);
        }
        check_languages_differ(&source_lang, &request.to, request.force)?;

        write_translated(input_path, &source_lang, &request.to, request.mode, &document.render()).await
    }

    /// Extract one subtitle track next to the video
    pub async fn extract<P: AsRef<Path>>(&self, video_path: P, track: usize) -> Result<PathBuf> {
        let video_path = video_path.as_ref();
        self.extractor.check_availability().await?;
        self.extractor.extract(video_path, track).await
    }

    /// Extract a track and, when it is text based, translate it
    pub async fn extract_and_translate<P: AsRef<Path>>(
        &self,
        video_path: P,
        track: usize,
        request: &TranslateRequest,
        progress: &dyn ProgressReporter,
    ) -> Result<(PathBuf, Option<PathBuf>)> {
        let extracted = self.extract(video_path, track).await?;

        if extracted.extension().is_some_and(|ext| ext == "srt") {
            let translated = self.translate_file(&extracted, request, progress).await?;
            Ok((extracted, Some(translated)))
        } else {
            warn!("{} is image based and cannot be translated", extracted.display());
            Ok((extracted, None))
        }
    }

    /// Translate every `.srt` file under a directory, skipping files already tagged with the target language
    pub async fn translate_directory<P: AsRef<Path>>(
        &self,
        input_dir: P,
        request: &TranslateRequest,
        progress: &dyn ProgressReporter,
    ) -> Result<DirectorySummary> {
        let input_dir = input_dir.as_ref();
        info!("Processing directory: {}", input_dir.display());

        if !input_dir.is_dir() {
            return Err(SubterfugeError::Config("Input path is not a directory".to_string()));
        }

        let subtitle_files = find_subtitle_files(input_dir, &request.to);
        info!("Found {} subtitle files to translate", subtitle_files.len());

        let mut summary = DirectorySummary::default();
        for path in subtitle_files {
            let relative = pathdiff::diff_paths(&path, input_dir).unwrap_or_else(|| path.clone());
            match self.translate_file(&path, request, progress).await {
                Ok(output) => {
                    info!("Translated {}", relative.display());
                    summary.translated.push(output);
                }
                Err(e) => {
                    warn!("Failed to translate {}: {}", relative.display(), e);
                    summary.failed.push((path, e.to_string()));
                }
            }
        }

        Ok(summary)
    }
}

/// The language to name the source file after
pub fn resolve_source_language(from: &str, detected: Option<&str>) -> String {
    match detected {
        Some(lang) if from == AUTO_DETECT && !lang.is_empty() => lang.to_string(),
        _ => from.to_string(),
    }
}

/// Refuse a translation whose source already is the target, unless forced
pub fn check_languages_differ(source_lang: &str, target_lang: &str, force: bool) -> Result<()> {
    if !force
        && source_lang != AUTO_DETECT
        && normalize_language_code(source_lang) == normalize_language_code(target_lang)
    {
        return Err(SubterfugeError::SameLanguage {
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
        });
    }
    Ok(())
}

fn find_subtitle_files(input_dir: &Path, target_lang: &str) -> Vec<PathBuf> {
    let target_suffix = format!(".{}", normalize_language_code(target_lang));
    let mut files: Vec<PathBuf> = WalkDir::new(input_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("srt"))
        })
        .filter(|path| {
            path.file_stem()
                .map(|stem| !stem.to_string_lossy().to_lowercase().ends_with(&target_suffix))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::progress::NoProgress;
    use crate::translate::{Translation, Translator};

    const DOC: &str = "1\n00:00:01,000 --> 00:00:02,000\n<i>Hola</i>\n\n2\n00:00:03,000 --> 00:00:04,000\nMundo";

    /// Uppercases text and reports a fixed detected language
    struct Shouting {
        detected: Option<&'static str>,
    }

    #[async_trait]
    impl Translator for Shouting {
        async fn translate(&self, text: &str, from: &str, _to: &str) -> Result<Translation> {
            let mut translation = Translation::new(text.to_uppercase());
            if from == AUTO_DETECT {
                translation.detected_language = self.detected.map(str::to_string);
            }
            Ok(translation)
        }
    }

    /// Echoes text and counts calls
    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Translator for Counting {
        async fn translate(&self, text: &str, _from: &str, _to: &str) -> Result<Translation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Translation::new(text))
        }
    }

    /// Writes a canned SRT next to the "video"
    struct FakeExtractor {
        codec: &'static str,
    }

    #[async_trait]
    impl SubtitleExtractor for FakeExtractor {
        async fn probe_codec(&self, _video_path: &Path, _track: usize) -> Result<String> {
            Ok(self.codec.to_string())
        }

        async fn extract(&self, video_path: &Path, _track: usize) -> Result<PathBuf> {
            let codec = crate::media::SubtitleCodec::from_name(self.codec)?;
            let path = crate::media::extracted_path(video_path, codec)?;
            std::fs::write(&path, DOC)?;
            Ok(path)
        }

        async fn check_availability(&self) -> Result<()> {
            Ok(())
        }
    }

    fn workflow(detected: Option<&'static str>, codec: &'static str) -> Workflow {
        let coordinator = BatchCoordinator::new(
            Box::new(Shouting { detected }),
            BatchOptions::default(),
        )
        .unwrap();
        Workflow::with_components(coordinator, Box::new(FakeExtractor { codec }))
    }

    fn request(from: &str, to: &str) -> TranslateRequest {
        TranslateRequest {
            from: from.to_string(),
            to: to.to_string(),
            mode: OutputMode::Create,
            force: false,
        }
    }

    #[tokio::test]
    async fn test_translate_file_writes_target() {
        let temp = TempDir::new().unwrap();
        let input = temp.child("show.srt");
        input.write_str(DOC).unwrap();

        let output = workflow(Some("es"), "subrip")
            .translate_file(input.path(), &request("auto", "en"), &NoProgress)
            .await
            .unwrap();

        assert_eq!(output, temp.path().join("show.en.srt"));
        temp.child("show.en.srt").assert(
            "1\n00:00:01,000 --> 00:00:02,000\nHOLA\n\n2\n00:00:03,000 --> 00:00:04,000\nMUNDO",
        );
    }

    #[tokio::test]
    async fn test_detected_language_drives_replace_mode() {
        let temp = TempDir::new().unwrap();
        let input = temp.child("show.es.srt");
        input.write_str(DOC).unwrap();

        let mut req = request("auto", "en");
        req.mode = OutputMode::Replace;
        let output = workflow(Some("es"), "subrip")
            .translate_file(input.path(), &req, &NoProgress)
            .await
            .unwrap();

        assert_eq!(output.as_path(), input.path());
        assert!(std::fs::read_to_string(input.path()).unwrap().contains("MUNDO"));
    }

    #[tokio::test]
    async fn test_same_language_refused_without_force() {
        let temp = TempDir::new().unwrap();
        let input = temp.child("show.srt");
        input.write_str(DOC).unwrap();

        let err = workflow(Some("en-US"), "subrip")
            .translate_file(input.path(), &request("auto", "en"), &NoProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, SubterfugeError::SameLanguage { .. }));
        assert!(!temp.child("show.en.srt").path().exists());

        let mut forced = request("auto", "en");
        forced.force = true;
        workflow(Some("en-US"), "subrip")
            .translate_file(input.path(), &forced, &NoProgress)
            .await
            .unwrap();
        assert!(temp.child("show.en.srt").path().exists());
    }

    #[tokio::test]
    async fn test_explicit_same_language_makes_no_calls() {
        let temp = TempDir::new().unwrap();
        let input = temp.child("show.srt");
        input.write_str(DOC).unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let coordinator = BatchCoordinator::new(
            Box::new(Counting { calls: Arc::clone(&calls) }),
            BatchOptions::default(),
        )
        .unwrap();
        let workflow = Workflow::with_components(coordinator, Box::new(FakeExtractor { codec: "subrip" }));

        let err = workflow
            .translate_file(input.path(), &request("en-GB", "en"), &NoProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, SubterfugeError::SameLanguage { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!temp.child("show.en.srt").path().exists());
    }

    #[tokio::test]
    async fn test_empty_document_is_no_entries() {
        let temp = TempDir::new().unwrap();
        let input = temp.child("empty.srt");
        input.write_str("\n\n").unwrap();

        let err = workflow(None, "subrip")
            .translate_file(input.path(), &request("de", "en"), &NoProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, SubterfugeError::NoEntries));
    }

    #[tokio::test]
    async fn test_extract_and_translate() {
        let temp = TempDir::new().unwrap();
        let video = temp.child("film.mkv");
        video.write_str("").unwrap();

        let (extracted, translated) = workflow(None, "subrip")
            .extract_and_translate(video.path(), 0, &request("es", "en"), &NoProgress)
            .await
            .unwrap();
        assert_eq!(extracted, temp.path().join("film.srt"));
        assert_eq!(translated, Some(temp.path().join("film.en.srt")));
    }

    #[tokio::test]
    async fn test_image_subtitles_are_not_translated() {
        let temp = TempDir::new().unwrap();
        let video = temp.child("film.mkv");
        video.write_str("").unwrap();

        let (extracted, translated) = workflow(None, "hdmv_pgs_subtitle")
            .extract_and_translate(video.path(), 1, &request("es", "en"), &NoProgress)
            .await
            .unwrap();
        assert_eq!(extracted, temp.path().join("film.sup"));
        assert_eq!(translated, None);
    }

    #[tokio::test]
    async fn test_translate_directory() {
        let temp = TempDir::new().unwrap();
        temp.child("a.srt").write_str(DOC).unwrap();
        temp.child("nested/b.es.srt").write_str(DOC).unwrap();
        temp.child("nested/b.en.srt").write_str(DOC).unwrap();
        temp.child("broken.srt").write_str("garbage").unwrap();
        temp.child("notes.txt").write_str(DOC).unwrap();

        let summary = workflow(None, "subrip")
            .translate_directory(temp.path(), &request("es", "en"), &NoProgress)
            .await
            .unwrap();

        assert_eq!(summary.translated, vec![temp.path().join("a.en.srt")]);
        let failed: Vec<PathBuf> = summary.failed.iter().map(|(path, _)| path.clone()).collect();
        assert_eq!(failed, vec![temp.path().join("broken.srt"), temp.path().join("nested/b.es.srt")]);
        assert_eq!(summary.failed.len(), 2);
    }

    #[test]
    fn test_resolve_source_language() {
        assert_eq!(resolve_source_language("auto", Some("ja")), "ja");
        assert_eq!(resolve_source_language("auto", None), "auto");
        assert_eq!(resolve_source_language("auto", Some("")), "auto");
        assert_eq!(resolve_source_language("de", Some("ja")), "de");
    }

    #[test]
    fn test_check_languages_differ() {
        assert!(check_languages_differ("en-GB", "en", false).is_err());
        assert!(check_languages_differ("en-GB", "en", true).is_ok());
        assert!(check_languages_differ("auto", "en", false).is_ok());
        assert!(check_languages_differ("fr", "en", false).is_ok());
    }
}
