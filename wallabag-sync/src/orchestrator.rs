//! One sync pass: fetch → filter → render → write → record.
//!
//! ## Pass protocol
//!
//! 1. Refuse to start unless the source is authenticated (no I/O).
//! 2. Take the pass lock.
//! 3. Load the synced set.
//! 4. Fetch articles for the configured archive side.
//! 5. Keep the ones whose id is not in the set, in server order.
//! 6. Materialize each: render + create note and/or PDF, then archive.
//! 7. Record each id and rewrite the set as soon as its article is done.
//!
//! Materialization runs on `concurrency` scoped worker threads; with one
//! worker the articles are processed strictly in server order. The first
//! failure stops dispatch, lets in-flight articles finish (and records
//! them), then fails the pass. An id is only recorded after its article is
//! fully materialized, so a failed article is retried on the next pass.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{bounded, unbounded};

use wallabag_core::{Article, ArticleId, ArticleSource, CreateOutcome, NoteStore, Notifier, Settings};
use wallabag_renderer::{NoteKind, RenderOptions, TemplateSet};

use crate::error::{remote_err, store_err, SyncError};
use crate::filename::{note_stem, vault_file};
use crate::lock::PassLock;
use crate::synced_store::{self, SyncedSet};

pub const AUTH_REQUIRED_NOTICE: &str = "Please authenticate with wallabag first.";
pub const IN_PROGRESS_NOTICE: &str = "Syncing from wallabag..";

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// What happened at one destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// File was created.
    Written { path: String },
    /// A file already existed there; nothing was written.
    Skipped { path: String },
    /// Dry run: the file *would* have been created.
    WouldWrite { path: String },
}

impl WriteOutcome {
    pub fn path(&self) -> &str {
        match self {
            WriteOutcome::Written { path }
            | WriteOutcome::Skipped { path }
            | WriteOutcome::WouldWrite { path } => path,
        }
    }
}

/// Summary of a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Ids newly recorded as synced (or that would be, in a dry run).
    pub synced: Vec<ArticleId>,
    /// Per-path outcomes, grouped by article in completion order.
    pub writes: Vec<WriteOutcome>,
    /// Articles archived on the server.
    pub archived: Vec<ArticleId>,
    pub dry_run: bool,
}

impl SyncReport {
    pub fn written(&self) -> usize {
        self.count(|w| matches!(w, WriteOutcome::Written { .. } | WriteOutcome::WouldWrite { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|w| matches!(w, WriteOutcome::Skipped { .. }))
    }

    fn count(&self, pred: impl Fn(&WriteOutcome) -> bool) -> usize {
        self.writes.iter().filter(|w| pred(w)).count()
    }

    /// Completion message shown to the user.
    pub fn summary(&self) -> String {
        if self.dry_run {
            format!(
                "Dry run: {} new article(s) would be synced.",
                self.synced.len()
            )
        } else {
            format!(
                "Sync from wallabag is now completed. {} new article(s) has been synced.",
                self.synced.len()
            )
        }
    }
}

/// One article, fully materialized.
#[derive(Debug)]
struct Materialized {
    id: ArticleId,
    writes: Vec<WriteOutcome>,
    archived: bool,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Runs sync passes for one settings value against injected collaborators.
pub struct SyncOrchestrator<'a> {
    settings: &'a Settings,
    source: &'a dyn ArticleSource,
    store: &'a dyn NoteStore,
    notifier: &'a dyn Notifier,
    state_dir: PathBuf,
    dry_run: bool,
}

impl<'a> SyncOrchestrator<'a> {
    pub fn new(
        settings: &'a Settings,
        source: &'a dyn ArticleSource,
        store: &'a dyn NoteStore,
        notifier: &'a dyn Notifier,
        state_dir: impl Into<PathBuf>,
    ) -> Self {
        SyncOrchestrator {
            settings,
            source,
            store,
            notifier,
            state_dir: state_dir.into(),
            dry_run: false,
        }
    }

    /// Plan only: nothing is written, exported, archived, or recorded.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Execute one pass.
    pub fn run_sync(&self) -> Result<SyncReport, SyncError> {
        if !self.source.is_authenticated() {
            self.notifier.notice(AUTH_REQUIRED_NOTICE);
            return Err(SyncError::AuthRequired);
        }

        let _lock = if self.dry_run {
            None
        } else {
            Some(PassLock::acquire(&self.state_dir)?)
        };

        let mut synced = synced_store::load(&self.state_dir)?;
        self.notifier.notice(IN_PROGRESS_NOTICE);

        let articles = self
            .source
            .fetch_articles(self.settings.archive_filter())
            .map_err(remote_err("fetch articles", None))?;
        let fresh = new_articles(&articles, &synced);
        tracing::info!(
            "{} article(s) fetched, {} not yet synced",
            articles.len(),
            fresh.len()
        );

        let mut report = SyncReport {
            dry_run: self.dry_run,
            ..SyncReport::default()
        };
        if fresh.is_empty() {
            self.notifier.notice(&report.summary());
            return Ok(report);
        }

        if self.dry_run {
            for article in &fresh {
                report.writes.extend(self.plan(article)?);
                report.synced.push(article.id);
            }
            self.notifier.notice(&report.summary());
            return Ok(report);
        }

        let templates = self.load_templates()?;
        let result = self.materialize_all(&fresh, &templates, &mut synced, &mut report);
        if let Err(e) = result {
            tracing::warn!(
                "sync aborted after {} of {} article(s): {e}",
                report.synced.len(),
                fresh.len()
            );
            return Err(e);
        }

        self.notifier.notice(&report.summary());
        Ok(report)
    }

    // -----------------------------------------------------------------------
    // Scheduling
    // -----------------------------------------------------------------------

    fn materialize_all(
        &self,
        fresh: &[&Article],
        templates: &TemplateSet,
        synced: &mut SyncedSet,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        let workers = self.settings.concurrency.clamp(1, fresh.len());
        if workers == 1 {
            for article in fresh {
                let done = self.materialize(article, templates)?;
                self.record(done, synced, report)?;
            }
            return Ok(());
        }

        let (job_tx, job_rx) = bounded::<&Article>(workers);
        let (done_tx, done_rx) = unbounded::<Result<Materialized, SyncError>>();
        let abort = AtomicBool::new(false);
        let abort = &abort;

        std::thread::scope(|s| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let done_tx = done_tx.clone();
                s.spawn(move || {
                    while let Ok(article) = job_rx.recv() {
                        if abort.load(Ordering::Relaxed) {
                            break;
                        }
                        let result = self.materialize(article, templates);
                        if result.is_err() {
                            abort.store(true, Ordering::Relaxed);
                        }
                        if done_tx.send(result).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(job_rx);
            drop(done_tx);

            s.spawn(move || {
                for article in fresh {
                    if abort.load(Ordering::Relaxed) || job_tx.send(*article).is_err() {
                        break;
                    }
                }
            });

            let mut first_err = None;
            for result in done_rx.iter() {
                let recorded = result.and_then(|done| self.record(done, synced, report));
                if let Err(e) = recorded {
                    abort.store(true, Ordering::Relaxed);
                    first_err.get_or_insert(e);
                }
            }
            first_err.map_or(Ok(()), Err)
        })
    }

    fn record(
        &self,
        done: Materialized,
        synced: &mut SyncedSet,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        synced.insert(done.id);
        synced_store::save(&self.state_dir, synced)?;
        report.synced.push(done.id);
        report.writes.extend(done.writes);
        if done.archived {
            report.archived.push(done.id);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Per-article materialization
    // -----------------------------------------------------------------------

    fn materialize(
        &self,
        article: &Article,
        templates: &TemplateSet,
    ) -> Result<Materialized, SyncError> {
        let s = self.settings;
        let stem = note_stem(&article.title, article.id, s.id_in_title);
        let note_path = vault_file(&s.folder, &stem, "md");
        let mut writes = Vec::new();

        if !s.download_as_pdf {
            let content = templates
                .for_kind(NoteKind::Article)
                .fill(article, &self.render_options(None));
            writes.push(self.create_note(&note_path, &content)?);
        } else {
            let pdf_path = vault_file(&s.pdf_folder, &stem, "pdf");
            writes.push(self.create_pdf(article.id, &pdf_path)?);
            if s.create_pdf_note {
                let content = templates
                    .for_kind(NoteKind::PdfReference)
                    .fill(article, &self.render_options(Some(pdf_path)));
                writes.push(self.create_note(&note_path, &content)?);
            }
        }

        // Archived even when every write was skipped.
        if s.archive_after_sync {
            self.source
                .archive(article.id)
                .map_err(remote_err("archive", Some(article.id)))?;
        }

        Ok(Materialized {
            id: article.id,
            writes,
            archived: s.archive_after_sync,
        })
    }

    fn create_note(&self, path: &str, content: &str) -> Result<WriteOutcome, SyncError> {
        if self.store.exists(path).map_err(store_err(path))? {
            return Ok(self.skip(path));
        }
        match self.store.create(path, content).map_err(store_err(path))? {
            CreateOutcome::Created => Ok(WriteOutcome::Written { path: path.to_string() }),
            CreateOutcome::AlreadyExists => Ok(self.skip(path)),
        }
    }

    fn create_pdf(&self, id: ArticleId, path: &str) -> Result<WriteOutcome, SyncError> {
        if self.store.exists(path).map_err(store_err(path))? {
            return Ok(self.skip(path));
        }
        let bytes = self
            .source
            .export_pdf(id)
            .map_err(remote_err("export", Some(id)))?;
        match self.store.create_binary(path, &bytes).map_err(store_err(path))? {
            CreateOutcome::Created => Ok(WriteOutcome::Written { path: path.to_string() }),
            CreateOutcome::AlreadyExists => Ok(self.skip(path)),
        }
    }

    fn skip(&self, path: &str) -> WriteOutcome {
        tracing::debug!("skip existing: {path}");
        self.notifier
            .notice(&format!("File {path} already exists. Skipping.."));
        WriteOutcome::Skipped { path: path.to_string() }
    }

    /// Destination outcomes a real pass would produce, without touching anything.
    fn plan(&self, article: &Article) -> Result<Vec<WriteOutcome>, SyncError> {
        let s = self.settings;
        let stem = note_stem(&article.title, article.id, s.id_in_title);
        let mut paths = Vec::new();
        if s.download_as_pdf {
            paths.push(vault_file(&s.pdf_folder, &stem, "pdf"));
        }
        if !s.download_as_pdf || s.create_pdf_note {
            paths.push(vault_file(&s.folder, &stem, "md"));
        }

        paths
            .into_iter()
            .map(|path| {
                if self.store.exists(&path).map_err(store_err(&path))? {
                    Ok(WriteOutcome::Skipped { path })
                } else {
                    Ok(WriteOutcome::WouldWrite { path })
                }
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Rendering inputs
    // -----------------------------------------------------------------------

    fn needs_templates(&self) -> bool {
        !self.settings.download_as_pdf || self.settings.create_pdf_note
    }

    fn load_templates(&self) -> Result<TemplateSet, SyncError> {
        let user = match self.settings.user_template_path() {
            Some(path) if self.needs_templates() => {
                let text = self.store.read(&path).map_err(store_err(&path))?;
                tracing::debug!("using user template {path}");
                Some(text)
            }
            _ => None,
        };
        Ok(TemplateSet::with_user(user))
    }

    fn render_options(&self, pdf_link: Option<String>) -> RenderOptions {
        RenderOptions {
            server_url: self.settings.server_base().to_string(),
            convert_html_to_markdown: self.settings.convert_html_to_markdown,
            tag_format: self.settings.tag_format,
            pdf_link,
        }
    }
}

/// Articles whose id is not yet in `synced`, in source order.
pub fn new_articles<'a>(articles: &'a [Article], synced: &SyncedSet) -> Vec<&'a Article> {
    articles.iter().filter(|a| !synced.contains(a.id)).collect()
}
