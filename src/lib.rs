//! Session wiring for the now-playing toast.
//!
//! A [`Session`] is what the host integration creates on attach: it loads the
//! configuration and catalog from the module directory, starts the worker and,
//! once the host has located its functions, installs the interception and
//! presentation hooks.

use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bgmtoast_backend::{AppContext, WorkerHandle, config};
use bgmtoast_bridge::config::Config;
use bgmtoast_catalog::Catalog;
use bgmtoast_catalog::source::TomlFileSource;
use bgmtoast_intercept::Interceptor;
use bgmtoast_intercept::detour::{self, FrameHook, HookProvider, HookTargets, InstalledHooks};
use bgmtoast_overlay::renderer::ImmediateRenderer;
use bgmtoast_overlay::{FrameInput, Overlay, ToastSettings};

pub mod replay;

/// Errors that prevent a session from starting.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to resolve the module directory: {0}")]
    ModuleDir(#[from] config::ConfigError),
    #[error("failed to spawn the worker thread: {0}")]
    Worker(#[from] std::io::Error),
}

/// Installs the process-wide logger: thread names and local timestamps on
/// every line, `RUST_LOG` overriding the default `info` level.
pub fn init_logging() -> Result<(), log::SetLoggerError> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .with_threads(true)
        .with_local_timestamps()
        .init()
}

/// A renderer bound to the host's presentation object.
///
/// `begin_frame` is called from the present hook with the host's pointer
/// before the toast is drawn; returning `None` skips the frame.
pub trait HostRenderer: ImmediateRenderer + Send {
    fn begin_frame(&mut self, presentation: *mut c_void) -> Option<FrameInput>;

    fn end_frame(&mut self);
}

/// One attached instance: configuration, catalog and the running worker.
#[derive(Debug)]
pub struct Session {
    module_dir: PathBuf,
    context: Arc<AppContext>,
    worker: Option<WorkerHandle>,
}

impl Session {
    /// Loads configuration and catalog from `module_dir` (or the platform
    /// configuration directory) and starts the worker.
    ///
    /// An unreadable or invalid configuration file is logged and replaced by
    /// the defaults. A missing catalog leaves detection inert.
    pub fn start(module_dir: Option<&Path>) -> Result<Self, SessionError> {
        let module_dir = match module_dir {
            Some(dir) => dir.to_path_buf(),
            None => config::default_module_dir()?,
        };
        log::info!("Starting session in {module_dir:?}");

        let config = config::load_config(&module_dir).unwrap_or_else(|err| {
            log::error!("{err}. Falling back to the default configuration.");
            Config::default()
        });
        let catalog = Catalog::load(&TomlFileSource::new(module_dir.join(&config.catalog.path)));

        let context = Arc::new(AppContext::new(config, catalog));
        let worker = bgmtoast_backend::run(context.clone())?;

        Ok(Self {
            module_dir,
            context,
            worker: Some(worker),
        })
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.context
    }

    pub fn config(&self) -> &Config {
        &self.context.config
    }

    /// Font the renderer should draw the toast with.
    pub fn font_path(&self) -> PathBuf {
        self.module_dir.join(&self.config().overlay.font_path)
    }

    /// Icon the renderer should load for [`ImmediateRenderer::icon`].
    pub fn icon_path(&self) -> PathBuf {
        self.module_dir.join(&self.config().overlay.icon_path)
    }

    /// Handler side of interception, for hosts that call it directly.
    pub fn interceptor(&self) -> Interceptor {
        self.context.interceptor()
    }

    pub fn toast_settings(&self) -> ToastSettings {
        ToastSettings::from_config(self.config())
    }

    /// A fresh overlay reading this session's notification board.
    pub fn overlay(&self) -> Overlay {
        Overlay::new(self.context.board.clone(), self.toast_settings())
    }

    /// Installs the file-open hooks and, if a renderer is given, the present
    /// hook drawing the toast. Hooks are process-wide, so this takes effect
    /// for the first session only.
    pub fn attach_hooks(
        &self,
        provider: &mut dyn HookProvider,
        targets: &HookTargets,
        renderer: Option<Box<dyn HostRenderer>>,
    ) -> InstalledHooks {
        let frame_hook = renderer.map(|renderer| self.frame_hook(renderer));
        detour::install_hooks(provider, targets, self.interceptor(), frame_hook)
    }

    fn frame_hook(&self, mut renderer: Box<dyn HostRenderer>) -> FrameHook {
        let mut overlay = self.overlay();
        Box::new(move |presentation| {
            if let Some(frame) = renderer.begin_frame(presentation) {
                overlay.on_frame(frame, renderer.as_mut());
                renderer.end_frame();
            }
        })
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| worker.is_running())
    }

    /// Stops and joins the worker. Installed hooks stay in place and keep
    /// forwarding to the originals.
    pub fn shutdown(mut self) {
        if let Some(worker) = self.worker.take() {
            worker.shutdown();
        }
        log::info!("Session stopped.");
    }
}
