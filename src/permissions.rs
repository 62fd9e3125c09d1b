// SPDX-License-Identifier: GPL-3.0-only

//! Camera and media library permissions
//!
//! Inside a Flatpak sandbox camera access goes through the
//! `org.freedesktop.portal.Camera` portal, which prompts the user. On the host
//! there is no prompt; access is whatever the device node permissions allow.
//! The media library is the gallery directory, granted when it is writable.

use crate::errors::PermissionError;
use crate::screen::PermissionUpdate;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

const PORTAL_DESTINATION: &str = "org.freedesktop.portal.Desktop";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";
const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";

/// Tri-state permission as seen by the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionStatus {
    /// Not asked yet
    #[default]
    Unknown,
    Denied,
    Granted,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }
}

/// Source of permission answers
///
/// Requests may block on a user prompt; callers run them off the UI thread.
pub trait PermissionProvider: Send + Sync {
    /// Current camera permission without prompting
    fn camera_status(&self) -> PermissionStatus;

    /// Ask for camera access, prompting if the platform does
    fn request_camera(&self) -> Result<PermissionStatus, PermissionError>;

    /// Ask for write access to the gallery
    fn request_media_library(&self) -> Result<PermissionStatus, PermissionError>;
}

/// One pass of the permission flow
///
/// Camera access is requested unless it is already granted (or always, when
/// the user pressed "Grant Permission"); media library access is requested
/// every time. Failed requests are logged and reported as `None`.
pub fn run_permission_flow(provider: &dyn PermissionProvider, force_camera: bool) -> PermissionUpdate {
    let current = provider.camera_status();
    let camera = if current.is_granted() && !force_camera {
        Some(current)
    } else {
        match provider.request_camera() {
            Ok(status) => Some(status),
            Err(e) => {
                error!(error = %e, "Camera permission request failed");
                None
            }
        }
    };

    let media_library = match provider.request_media_library() {
        Ok(status) => Some(status),
        Err(e) => {
            error!(error = %e, "Media library permission request failed");
            None
        }
    };

    PermissionUpdate {
        camera,
        media_library,
    }
}

/// True when running inside a Flatpak sandbox
pub fn is_sandboxed() -> bool {
    Path::new("/.flatpak-info").exists()
}

/// Permissions backed by the desktop portal, `/dev/video*` and the gallery directory
pub struct SystemPermissions {
    gallery_dir: PathBuf,
    sandboxed: bool,
}

impl SystemPermissions {
    pub fn new(gallery_dir: PathBuf) -> Self {
        let sandboxed = is_sandboxed();
        debug!(sandboxed, gallery = %gallery_dir.display(), "Permission provider ready");
        Self {
            gallery_dir,
            sandboxed,
        }
    }
}

impl PermissionProvider for SystemPermissions {
    fn camera_status(&self) -> PermissionStatus {
        if self.sandboxed {
            // The portal has no query call; the answer comes from AccessCamera
            return PermissionStatus::Unknown;
        }
        probe_video_devices(Path::new("/dev"))
    }

    fn request_camera(&self) -> Result<PermissionStatus, PermissionError> {
        if self.sandboxed {
            request_portal_camera()
        } else {
            Ok(probe_video_devices(Path::new("/dev")))
        }
    }

    fn request_media_library(&self) -> Result<PermissionStatus, PermissionError> {
        probe_writable_dir(&self.gallery_dir)
    }
}

/// Granted when at least one `/dev/video*` node can be opened read-write
fn probe_video_devices(dev_dir: &Path) -> PermissionStatus {
    let nodes: Vec<PathBuf> = std::fs::read_dir(dev_dir)
        .into_iter()
        .flatten()
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("video"))
        })
        .collect();

    if nodes.is_empty() {
        warn!(dir = %dev_dir.display(), "No video devices found");
        return PermissionStatus::Denied;
    }

    for node in &nodes {
        match std::fs::OpenOptions::new().read(true).write(true).open(node) {
            Ok(_) => {
                debug!(path = %node.display(), "Video device accessible");
                return PermissionStatus::Granted;
            }
            Err(e) => debug!(path = %node.display(), error = %e, "Video device not accessible"),
        }
    }

    warn!(
        count = nodes.len(),
        "Video devices present but none accessible, user may need to be in the 'video' group"
    );
    PermissionStatus::Denied
}

/// Granted when `dir` exists (or can be created) and accepts a new file
fn probe_writable_dir(dir: &Path) -> Result<PermissionStatus, PermissionError> {
    if let Err(e) = std::fs::create_dir_all(dir) {
        warn!(path = %dir.display(), error = %e, "Cannot create gallery directory");
        return Ok(PermissionStatus::Denied);
    }

    let probe = dir.join(format!(".quickcam-probe-{}", uuid::Uuid::new_v4()));
    match std::fs::write(&probe, b"") {
        Ok(()) => {
            std::fs::remove_file(&probe).map_err(|e| {
                PermissionError::Probe(format!("remove {}: {}", probe.display(), e))
            })?;
            info!(path = %dir.display(), "Gallery directory writable");
            Ok(PermissionStatus::Granted)
        }
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "Gallery directory not writable");
            Ok(PermissionStatus::Denied)
        }
    }
}

/// Ask the desktop portal for camera access and wait for the user's answer
fn request_portal_camera() -> Result<PermissionStatus, PermissionError> {
    let connection = zbus::blocking::Connection::session()?;

    // The request object path is predictable from our unique name and the
    // handle token; subscribe before calling so the response cannot be missed.
    let sender = connection
        .unique_name()
        .map(|name| name.as_str().trim_start_matches(':').replace('.', "_"))
        .ok_or_else(|| PermissionError::Portal("no unique bus name".to_string()))?;
    let token = format!("quickcam_{}", uuid::Uuid::new_v4().simple());
    let request_path = format!("{}/request/{}/{}", PORTAL_PATH, sender, token);

    let request = zbus::blocking::Proxy::new(
        &connection,
        PORTAL_DESTINATION,
        request_path.as_str(),
        REQUEST_INTERFACE,
    )?;
    let mut responses = request.receive_signal("Response")?;

    let camera = zbus::blocking::Proxy::new(
        &connection,
        PORTAL_DESTINATION,
        PORTAL_PATH,
        CAMERA_INTERFACE,
    )?;

    let present: bool = camera.get_property("IsCameraPresent")?;
    if !present {
        warn!("Portal reports no camera present");
        return Ok(PermissionStatus::Denied);
    }

    let mut options: HashMap<&str, Value> = HashMap::new();
    options.insert("handle_token", Value::new(token.as_str()));
    let handle: OwnedObjectPath = camera.call("AccessCamera", &(options,))?;
    debug!(handle = %handle.as_str(), "Camera access requested from portal");

    let message = responses
        .next()
        .ok_or_else(|| PermissionError::Portal("response stream closed".to_string()))?;
    let (code, _results): (u32, HashMap<String, OwnedValue>) = message.body().deserialize()?;

    let status = portal_response_status(code);
    info!(code, status = ?status, "Portal camera access answered");
    Ok(status)
}

/// Portal response codes: 0 success, 1 cancelled by user, 2 other failure
fn portal_response_status(code: u32) -> PermissionStatus {
    match code {
        0 => PermissionStatus::Granted,
        _ => PermissionStatus::Denied,
    }
}
