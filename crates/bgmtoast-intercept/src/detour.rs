//! Replacement functions handed to the hook provider.
//!
//! The provider redirects the host's calls into the `*_detour` functions
//! below. A detour cannot carry context, so each one reads the original
//! function pointer and its dispatch target from a process-wide slot written
//! exactly once by [`install_hooks`]. Everything else lives in the explicit
//! context objects of the caller.

use std::ffi::{CStr, c_char, c_void};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, OnceLock, PoisonError};

use crate::handler::Interceptor;

/// Opaque handle returned by the file-open functions.
pub type RawHandle = *mut c_void;

/// Signature of the wide file-open entry point.
pub type OpenFileWideFn = unsafe extern "system" fn(
    *const u16,
    u32,
    u32,
    *mut c_void,
    u32,
    u32,
    RawHandle,
) -> RawHandle;

/// Signature of the narrow file-open entry point.
pub type OpenFileNarrowFn = unsafe extern "system" fn(
    *const c_char,
    u32,
    u32,
    *mut c_void,
    u32,
    u32,
    RawHandle,
) -> RawHandle;

/// Signature of the presentation entry point called once per host frame.
pub type PresentFn = unsafe extern "system" fn(*mut c_void, u32, u32) -> i32;

/// Per-frame callback run before the original presentation call. It receives
/// the host's presentation object.
pub type FrameHook = Box<dyn FnMut(*mut c_void) + Send>;

/// Returned by the file-open detours when no original is available.
pub const INVALID_HANDLE: RawHandle = usize::MAX as RawHandle;

/// Held for a whole [`install_hooks`] call so a slot check and the provider
/// redirect it guards happen together.
static INSTALL_LOCK: Mutex<()> = Mutex::new(());
static INTERCEPTOR: OnceLock<Interceptor> = OnceLock::new();
static FRAME_HOOK: OnceLock<Mutex<FrameHook>> = OnceLock::new();
static ORIGINAL_OPEN_FILE_WIDE: OnceLock<OpenFileWideFn> = OnceLock::new();
static ORIGINAL_OPEN_FILE_NARROW: OnceLock<OpenFileNarrowFn> = OnceLock::new();
static ORIGINAL_PRESENT: OnceLock<PresentFn> = OnceLock::new();

/// The three host functions this crate replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    OpenFileWide,
    OpenFileNarrow,
    Present,
}

impl fmt::Display for HookKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            HookKind::OpenFileWide => "wide file-open",
            HookKind::OpenFileNarrow => "narrow file-open",
            HookKind::Present => "present",
        })
    }
}

/// Errors that can occur while installing a single hook.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// The address of the target function was not located by the caller.
    #[error("no target address for the {0} hook")]
    MissingTarget(HookKind),
    /// Hooks are process-wide and this one was installed before.
    #[error("the {0} hook is already installed")]
    AlreadyInstalled(HookKind),
    /// The provider reported success but handed back no original function.
    #[error("the provider returned a null original for the {0} hook")]
    NullOriginal(HookKind),
    /// The provider itself failed.
    #[error("hook provider failed: {0}")]
    Provider(String),
}

/// The mechanism that redirects host calls into replacement functions.
pub trait HookProvider {
    /// Redirects `target` to `replacement` and returns a callable pointer to
    /// the original behavior.
    fn install(
        &mut self,
        target: *mut c_void,
        replacement: *mut c_void,
    ) -> Result<*mut c_void, HookError>;

    /// Activates every installed redirection.
    fn enable_all(&mut self) -> Result<(), HookError>;
}

/// Addresses of the host functions to replace. A `None` skips that hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct HookTargets {
    pub open_file_wide: Option<*mut c_void>,
    pub open_file_narrow: Option<*mut c_void>,
    pub present: Option<*mut c_void>,
}

/// Which hooks ended up installed and enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstalledHooks {
    pub open_file_wide: bool,
    pub open_file_narrow: bool,
    pub present: bool,
    pub enabled: bool,
}

/// Installs the three detours through `provider` and enables them.
///
/// Failures are per hook: each one is logged and the remaining hooks are
/// still attempted. `frame_hook` is only registered, and the present detour
/// only installed, when it is given.
pub fn install_hooks(
    provider: &mut dyn HookProvider,
    targets: &HookTargets,
    interceptor: Interceptor,
    frame_hook: Option<FrameHook>,
) -> InstalledHooks {
    let _installing = INSTALL_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if INTERCEPTOR.set(interceptor).is_err() {
        log::warn!("Interception handlers are already bound to an earlier session.");
    }

    let mut installed = InstalledHooks {
        open_file_wide: report(
            HookKind::OpenFileWide,
            install_open_file_wide(provider, targets.open_file_wide),
        ),
        open_file_narrow: report(
            HookKind::OpenFileNarrow,
            install_open_file_narrow(provider, targets.open_file_narrow),
        ),
        ..InstalledHooks::default()
    };

    if let Some(frame_hook) = frame_hook {
        if FRAME_HOOK.set(Mutex::new(frame_hook)).is_err() {
            log::warn!("A frame callback is already registered.");
        }
        installed.present = report(HookKind::Present, install_present(provider, targets.present));
    }

    installed.enabled = match provider.enable_all() {
        Ok(()) => {
            log::info!("All hooks enabled.");
            true
        }
        Err(err) => {
            log::error!("Failed to enable hooks: {err}");
            false
        }
    };
    installed
}

fn report(kind: HookKind, result: Result<(), HookError>) -> bool {
    match result {
        Ok(()) => {
            log::info!("Hooked {kind} successfully.");
            true
        }
        Err(err) => {
            log::error!("Failed to hook {kind}: {err}");
            false
        }
    }
}

fn install_raw<F>(
    provider: &mut dyn HookProvider,
    kind: HookKind,
    slot: &OnceLock<F>,
    target: Option<*mut c_void>,
    replacement: *mut c_void,
) -> Result<*mut c_void, HookError> {
    if slot.get().is_some() {
        return Err(HookError::AlreadyInstalled(kind));
    }
    let target = target.ok_or(HookError::MissingTarget(kind))?;
    let original = provider.install(target, replacement)?;
    if original.is_null() {
        return Err(HookError::NullOriginal(kind));
    }
    Ok(original)
}

fn install_open_file_wide(
    provider: &mut dyn HookProvider,
    target: Option<*mut c_void>,
) -> Result<(), HookError> {
    let kind = HookKind::OpenFileWide;
    let replacement = open_file_wide_detour as OpenFileWideFn as *mut c_void;
    let original = install_raw(provider, kind, &ORIGINAL_OPEN_FILE_WIDE, target, replacement)?;
    // SAFETY: the provider returns a callable pointer with the signature of
    // the function it redirected.
    let original = unsafe { std::mem::transmute::<*mut c_void, OpenFileWideFn>(original) };
    ORIGINAL_OPEN_FILE_WIDE
        .set(original)
        .map_err(|_| HookError::AlreadyInstalled(kind))
}

fn install_open_file_narrow(
    provider: &mut dyn HookProvider,
    target: Option<*mut c_void>,
) -> Result<(), HookError> {
    let kind = HookKind::OpenFileNarrow;
    let replacement = open_file_narrow_detour as OpenFileNarrowFn as *mut c_void;
    let original = install_raw(provider, kind, &ORIGINAL_OPEN_FILE_NARROW, target, replacement)?;
    // SAFETY: see `install_open_file_wide`.
    let original = unsafe { std::mem::transmute::<*mut c_void, OpenFileNarrowFn>(original) };
    ORIGINAL_OPEN_FILE_NARROW
        .set(original)
        .map_err(|_| HookError::AlreadyInstalled(kind))
}

fn install_present(
    provider: &mut dyn HookProvider,
    target: Option<*mut c_void>,
) -> Result<(), HookError> {
    let kind = HookKind::Present;
    let replacement = present_detour as PresentFn as *mut c_void;
    let original = install_raw(provider, kind, &ORIGINAL_PRESENT, target, replacement)?;
    // SAFETY: see `install_open_file_wide`.
    let original = unsafe { std::mem::transmute::<*mut c_void, PresentFn>(original) };
    ORIGINAL_PRESENT
        .set(original)
        .map_err(|_| HookError::AlreadyInstalled(kind))
}

/// Borrows a NUL-terminated UTF-16 string.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated sequence that stays alive
/// and unmodified for `'a`.
unsafe fn wide_path<'a>(ptr: *const u16) -> Option<&'a [u16]> {
    if ptr.is_null() {
        return None;
    }
    let mut len = 0;
    // SAFETY: the caller guarantees a terminator exists.
    while unsafe { *ptr.add(len) } != 0 {
        len += 1;
    }
    // SAFETY: `len` units before the terminator are initialized.
    Some(unsafe { std::slice::from_raw_parts(ptr, len) })
}

/// Borrows a NUL-terminated byte string.
///
/// # Safety
/// Same contract as [`wide_path`].
unsafe fn narrow_path<'a>(ptr: *const c_char) -> Option<&'a [u8]> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: upheld by the caller.
    Some(unsafe { CStr::from_ptr(ptr) }.to_bytes())
}

/// Replacement for the wide file-open function.
///
/// # Safety
/// Called by the host with the arguments of the original function.
pub unsafe extern "system" fn open_file_wide_detour(
    file_name: *const u16,
    access: u32,
    share_mode: u32,
    security: *mut c_void,
    disposition: u32,
    flags: u32,
    template: RawHandle,
) -> RawHandle {
    let Some(original) = ORIGINAL_OPEN_FILE_WIDE.get().copied() else {
        return INVALID_HANDLE;
    };
    // SAFETY: the host passes a valid path or null.
    let path = unsafe { wide_path(file_name) };
    // SAFETY: forwarding the host's own arguments unchanged.
    let forward = || unsafe {
        original(file_name, access, share_mode, security, disposition, flags, template)
    };
    match INTERCEPTOR.get() {
        Some(interceptor) => interceptor.intercept_wide(path, forward),
        None => forward(),
    }
}

/// Replacement for the narrow file-open function.
///
/// # Safety
/// Called by the host with the arguments of the original function.
pub unsafe extern "system" fn open_file_narrow_detour(
    file_name: *const c_char,
    access: u32,
    share_mode: u32,
    security: *mut c_void,
    disposition: u32,
    flags: u32,
    template: RawHandle,
) -> RawHandle {
    let Some(original) = ORIGINAL_OPEN_FILE_NARROW.get().copied() else {
        return INVALID_HANDLE;
    };
    // SAFETY: the host passes a valid path or null.
    let path = unsafe { narrow_path(file_name) };
    // SAFETY: forwarding the host's own arguments unchanged.
    let forward = || unsafe {
        original(file_name, access, share_mode, security, disposition, flags, template)
    };
    match INTERCEPTOR.get() {
        Some(interceptor) => interceptor.intercept_narrow(path, forward),
        None => forward(),
    }
}

/// Replacement for the presentation function. Runs the frame callback, then
/// presents through the original.
///
/// # Safety
/// Called by the host with the arguments of the original function.
pub unsafe extern "system" fn present_detour(
    swap_chain: *mut c_void,
    sync_interval: u32,
    flags: u32,
) -> i32 {
    if let Some(frame_hook) = FRAME_HOOK.get() {
        // A frame still being drawn elsewhere is skipped rather than waited on.
        if let Ok(mut callback) = frame_hook.try_lock() {
            let callback = &mut **callback;
            let _ = panic::catch_unwind(AssertUnwindSafe(|| callback(swap_chain)));
        }
    }

    match ORIGINAL_PRESENT.get() {
        // SAFETY: forwarding the host's own arguments unchanged.
        Some(original) => unsafe { original(swap_chain, sync_interval, flags) },
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::filter::WatchedExtension;
    use crate::mailbox::Mailbox;

    static PRESENTED: AtomicUsize = AtomicUsize::new(0);

    unsafe extern "system" fn fake_open_narrow(
        file_name: *const c_char,
        _: u32,
        _: u32,
        _: *mut c_void,
        _: u32,
        _: u32,
        _: RawHandle,
    ) -> RawHandle {
        // SAFETY: tests only pass literals.
        unsafe { CStr::from_ptr(file_name) }.to_bytes().len() as RawHandle
    }

    unsafe extern "system" fn fake_present(_: *mut c_void, sync_interval: u32, _: u32) -> i32 {
        PRESENTED.fetch_add(1, Ordering::SeqCst);
        sync_interval as i32 + 7
    }

    /// Redirects nothing; hands back the fake originals by target.
    struct FakeProvider {
        installed: Vec<usize>,
        fail_enable: bool,
    }

    impl FakeProvider {
        fn new(fail_enable: bool) -> Self {
            Self {
                installed: Vec::new(),
                fail_enable,
            }
        }
    }

    fn targets() -> HookTargets {
        HookTargets {
            open_file_wide: Some(std::ptr::null_mut()),
            open_file_narrow: Some(fake_open_narrow as OpenFileNarrowFn as *mut c_void),
            present: Some(fake_present as PresentFn as *mut c_void),
        }
    }

    impl HookProvider for FakeProvider {
        fn install(
            &mut self,
            target: *mut c_void,
            replacement: *mut c_void,
        ) -> Result<*mut c_void, HookError> {
            if target.is_null() {
                return Err(HookError::Provider("null target".to_string()));
            }
            // Widen the window between the slot check and the slot write.
            thread::sleep(Duration::from_millis(20));
            self.installed.push(replacement as usize);
            Ok(target)
        }

        fn enable_all(&mut self) -> Result<(), HookError> {
            if self.fail_enable {
                return Err(HookError::Provider("cannot enable".to_string()));
            }
            Ok(())
        }
    }

    // The detour slots are process-wide, so the whole lifecycle lives in one
    // test.
    #[test]
    fn concurrent_installs_redirect_once_and_forward_to_originals() {
        let mailbox = Arc::new(Mailbox::new());
        let interceptor = Interceptor::new(mailbox.clone(), WatchedExtension::OGG);
        let frames = Arc::new(AtomicUsize::new(0));

        // Two sessions attaching at once: the provider must redirect each
        // target only once, and only one caller owns the result.
        let results: Vec<(InstalledHooks, usize)> = thread::scope(|scope| {
            let installers: Vec<_> = (0..2)
                .map(|_| {
                    let interceptor = interceptor.clone();
                    let frames = frames.clone();
                    scope.spawn(move || {
                        let frame_hook: FrameHook = Box::new(move |_| {
                            frames.fetch_add(1, Ordering::SeqCst);
                        });
                        let mut provider = FakeProvider::new(false);
                        let installed =
                            install_hooks(&mut provider, &targets(), interceptor, Some(frame_hook));
                        (installed, provider.installed.len())
                    })
                })
                .collect();
            installers
                .into_iter()
                .map(|installer| installer.join().unwrap())
                .collect()
        });

        let redirects: usize = results.iter().map(|(_, count)| count).sum();
        assert_eq!(redirects, 2);
        let winners: Vec<_> = results
            .iter()
            .map(|(installed, _)| *installed)
            .filter(|installed| installed.open_file_narrow)
            .collect();
        assert_eq!(
            winners,
            [InstalledHooks {
                open_file_wide: false,
                open_file_narrow: true,
                present: true,
                enabled: true,
            }]
        );

        let name = c"C:\\game\\bgm\\town.ogg";
        let handle = unsafe {
            open_file_narrow_detour(name.as_ptr(), 0, 0, std::ptr::null_mut(), 0, 0, std::ptr::null_mut())
        };
        assert_eq!(handle as usize, name.to_bytes().len());
        assert_eq!(mailbox.take_if_present().as_deref(), Some("C:\\game\\bgm\\town.ogg"));

        let name = c"C:\\game\\data\\map.dat";
        let handle = unsafe {
            open_file_narrow_detour(name.as_ptr(), 0, 0, std::ptr::null_mut(), 0, 0, std::ptr::null_mut())
        };
        assert_eq!(handle as usize, name.to_bytes().len());
        assert!(!mailbox.has_unread());

        // Not installed: no original to forward to.
        let wide: Vec<u16> = "C:\\bgm.ogg\0".encode_utf16().collect();
        let handle = unsafe {
            open_file_wide_detour(wide.as_ptr(), 0, 0, std::ptr::null_mut(), 0, 0, std::ptr::null_mut())
        };
        assert_eq!(handle, INVALID_HANDLE);
        assert!(!mailbox.has_unread());

        let result = unsafe { present_detour(std::ptr::null_mut(), 1, 0) };
        assert_eq!(result, 8);
        assert_eq!(frames.load(Ordering::SeqCst), 1);
        assert_eq!(PRESENTED.load(Ordering::SeqCst), 1);

        // A second session in the same process cannot take the slots over.
        let mut provider = FakeProvider::new(true);
        let installed = install_hooks(&mut provider, &targets(), interceptor, None);
        assert!(!installed.open_file_narrow);
        assert!(!installed.present);
        assert!(!installed.enabled);
        assert!(provider.installed.is_empty());
    }

    #[test]
    fn wide_path_stops_at_the_terminator() {
        let units: Vec<u16> = "abc\0def".encode_utf16().collect();
        let path = unsafe { wide_path(units.as_ptr()) }.unwrap();
        assert_eq!(path, &units[..3]);
        assert!(unsafe { wide_path(std::ptr::null()) }.is_none());
    }
}
