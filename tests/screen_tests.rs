// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the camera screen flow
//!
//! Drives `Screen` the way the application does, with in-memory permission,
//! camera and gallery implementations standing in for the system ones.

use quickcam::backends::camera::{CameraDevice, CameraSettings, Facing, ImageRef};
use quickcam::errors::{CaptureError, PermissionError, SaveError};
use quickcam::flash::FlashMode;
use quickcam::permissions::{PermissionProvider, PermissionStatus, run_permission_flow};
use quickcam::screen::{CaptureState, Gate, Operation, PermissionUpdate, Rejected, Screen};
use quickcam::storage::GalleryWriter;
use std::path::PathBuf;
use std::sync::Mutex;

use PermissionStatus::{Denied, Granted, Unknown};

struct FakePermissions {
    camera_status: PermissionStatus,
    camera_answer: Result<PermissionStatus, PermissionError>,
    media_answer: Result<PermissionStatus, PermissionError>,
    camera_requests: Mutex<u32>,
}

impl FakePermissions {
    fn new(
        camera_status: PermissionStatus,
        camera_answer: Result<PermissionStatus, PermissionError>,
        media_answer: Result<PermissionStatus, PermissionError>,
    ) -> Self {
        Self {
            camera_status,
            camera_answer,
            media_answer,
            camera_requests: Mutex::new(0),
        }
    }

    fn camera_requests(&self) -> u32 {
        *self.camera_requests.lock().unwrap()
    }
}

impl PermissionProvider for FakePermissions {
    fn camera_status(&self) -> PermissionStatus {
        self.camera_status
    }

    fn request_camera(&self) -> Result<PermissionStatus, PermissionError> {
        *self.camera_requests.lock().unwrap() += 1;
        self.camera_answer.clone()
    }

    fn request_media_library(&self) -> Result<PermissionStatus, PermissionError> {
        self.media_answer.clone()
    }
}

struct FakeCamera {
    next: Result<ImageRef, CaptureError>,
    calls: Mutex<Vec<CameraSettings>>,
}

impl FakeCamera {
    fn returning(next: Result<ImageRef, CaptureError>) -> Self {
        Self {
            next,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl CameraDevice for FakeCamera {
    fn capture(&self, settings: CameraSettings) -> Result<ImageRef, CaptureError> {
        self.calls.lock().unwrap().push(settings);
        self.next.clone()
    }
}

struct FakeGallery {
    fail: bool,
    saved: Mutex<Vec<ImageRef>>,
}

impl FakeGallery {
    fn new(fail: bool) -> Self {
        Self {
            fail,
            saved: Mutex::new(Vec::new()),
        }
    }
}

impl GalleryWriter for FakeGallery {
    fn create_asset(&self, image: &ImageRef) -> Result<PathBuf, SaveError> {
        self.saved.lock().unwrap().push(image.clone());
        if self.fail {
            Err(SaveError::Io("disk full".to_string()))
        } else {
            Ok(PathBuf::from("/gallery/IMG_20260101_120000.jpg"))
        }
    }
}

fn granted() -> PermissionUpdate {
    PermissionUpdate {
        camera: Some(Granted),
        media_library: Some(Granted),
    }
}

/// A screen past the gate with a live camera
fn ready_screen() -> Screen {
    let mut screen = Screen::default();
    screen.apply_permissions(granted());
    screen.mark_camera_ready();
    screen
}

fn take_picture(screen: &mut Screen, camera: &dyn CameraDevice) {
    let settings = screen.begin_capture().expect("capture should start");
    screen.finish_capture(camera.capture(settings));
}

fn save(screen: &mut Screen, gallery: &dyn GalleryWriter) -> Option<ImageRef> {
    let image = screen.begin_save().expect("save should start");
    screen.finish_save(gallery.create_asset(&image))
}

#[test]
fn test_gate_for_every_permission_combination() {
    let cases = [
        (Unknown, Unknown, Gate::Checking),
        (Unknown, Granted, Gate::Checking),
        (Denied, Unknown, Gate::Denied),
        (Denied, Granted, Gate::Denied),
        (Granted, Unknown, Gate::RequestingMedia),
        (Granted, Denied, Gate::RequestingMedia),
        (Granted, Granted, Gate::Ready),
    ];

    for (camera, media_library, expected) in cases {
        let mut screen = Screen::default();
        screen.apply_permissions(PermissionUpdate {
            camera: Some(camera),
            media_library: Some(media_library),
        });
        assert_eq!(
            screen.gate(),
            expected,
            "camera {:?}, media {:?}",
            camera,
            media_library
        );
    }
}

#[test]
fn test_new_screen_is_checking_in_preview() {
    let screen = Screen::new(CameraSettings::default());
    assert_eq!(screen.gate(), Gate::Checking);
    assert_eq!(screen.capture_state(), &CaptureState::Preview);
    assert!(!screen.is_camera_ready());
    assert_eq!(screen.settings().facing, Facing::Back);
    assert_eq!(screen.settings().flash, FlashMode::Off);
}

#[test]
fn test_take_picture_refused_until_camera_ready() {
    let camera = FakeCamera::returning(Ok(ImageRef::new("/cache/capture-1.jpg")));
    let mut screen = Screen::default();
    screen.apply_permissions(granted());

    assert_eq!(screen.begin_capture(), Err(Rejected::NotReady));
    assert!(camera.calls.lock().unwrap().is_empty());
    assert_eq!(screen.capture_state(), &CaptureState::Preview);
    assert_eq!(screen.in_flight(), None);
}

#[test]
fn test_camera_readiness_latches() {
    let mut screen = Screen::default();
    assert!(screen.mark_camera_ready());
    assert!(!screen.mark_camera_ready());
    assert!(screen.is_camera_ready());
}

#[test]
fn test_capture_moves_to_review_with_returned_image() {
    let image = ImageRef::new("/cache/capture-1.jpg");
    let camera = FakeCamera::returning(Ok(image.clone()));
    let mut screen = ready_screen();

    take_picture(&mut screen, &camera);

    assert_eq!(
        screen.capture_state(),
        &CaptureState::Reviewing {
            image: image.clone()
        }
    );
    assert_eq!(screen.pending_image(), Some(&image));
    assert_eq!(screen.in_flight(), None);
}

#[test]
fn test_capture_uses_current_settings() {
    let camera = FakeCamera::returning(Ok(ImageRef::new("/cache/capture-1.jpg")));
    let mut screen = ready_screen();
    screen.toggle_facing().unwrap();
    screen.toggle_flash().unwrap();

    take_picture(&mut screen, &camera);

    let calls = camera.calls.lock().unwrap();
    assert_eq!(
        calls.as_slice(),
        &[CameraSettings {
            facing: Facing::Front,
            flash: FlashMode::On,
        }]
    );
}

#[test]
fn test_failed_capture_stays_in_preview() {
    let camera = FakeCamera::returning(Err(CaptureError::NoFrame));
    let mut screen = ready_screen();

    take_picture(&mut screen, &camera);

    assert_eq!(screen.capture_state(), &CaptureState::Preview);
    assert_eq!(screen.in_flight(), None);
    assert!(screen.begin_capture().is_ok(), "a new attempt is allowed");
}

#[test]
fn test_retake_discards_pending_image() {
    let image = ImageRef::new("/cache/capture-1.jpg");
    let camera = FakeCamera::returning(Ok(image.clone()));
    let mut screen = ready_screen();
    take_picture(&mut screen, &camera);

    assert_eq!(screen.retake(), Ok(image));
    assert_eq!(screen.capture_state(), &CaptureState::Preview);
    assert_eq!(screen.pending_image(), None);
    assert_eq!(screen.retake(), Err(Rejected::NotReviewing));
}

#[test]
fn test_successful_save_returns_to_preview() {
    let image = ImageRef::new("/cache/capture-1.jpg");
    let camera = FakeCamera::returning(Ok(image.clone()));
    let gallery = FakeGallery::new(false);
    let mut screen = ready_screen();
    take_picture(&mut screen, &camera);

    let saved = save(&mut screen, &gallery);

    assert_eq!(saved, Some(image.clone()));
    assert_eq!(screen.capture_state(), &CaptureState::Preview);
    assert_eq!(gallery.saved.lock().unwrap().as_slice(), &[image]);
}

#[test]
fn test_failed_save_keeps_image_for_retry() {
    let image = ImageRef::new("/cache/capture-1.jpg");
    let camera = FakeCamera::returning(Ok(image.clone()));
    let gallery = FakeGallery::new(true);
    let mut screen = ready_screen();
    take_picture(&mut screen, &camera);

    assert_eq!(save(&mut screen, &gallery), None);
    assert_eq!(screen.pending_image(), Some(&image));
    assert_eq!(screen.in_flight(), None);

    // Retrying is allowed and uses the same image
    assert_eq!(screen.begin_save(), Ok(image));
}

#[test]
fn test_save_needs_media_library() {
    let camera = FakeCamera::returning(Ok(ImageRef::new("/cache/capture-1.jpg")));
    let mut screen = ready_screen();
    take_picture(&mut screen, &camera);

    screen.apply_permissions(PermissionUpdate {
        camera: None,
        media_library: Some(Denied),
    });

    assert!(matches!(
        screen.begin_save(),
        Err(Rejected::PermissionMissing(_))
    ));
    assert!(screen.pending_image().is_some());
}

#[test]
fn test_toggles_flip_and_flip_back() {
    let mut screen = ready_screen();

    assert_eq!(screen.toggle_facing(), Ok(Facing::Front));
    assert_eq!(screen.toggle_facing(), Ok(Facing::Back));
    assert_eq!(screen.toggle_flash(), Ok(FlashMode::On));
    assert_eq!(screen.toggle_flash(), Ok(FlashMode::Off));
}

#[test]
fn test_toggles_refused_while_reviewing() {
    let camera = FakeCamera::returning(Ok(ImageRef::new("/cache/capture-1.jpg")));
    let mut screen = ready_screen();
    take_picture(&mut screen, &camera);

    assert_eq!(screen.toggle_facing(), Err(Rejected::NotInPreview));
    assert_eq!(screen.toggle_flash(), Err(Rejected::NotInPreview));
    assert_eq!(screen.settings(), CameraSettings::default());
}

#[test]
fn test_double_tap_is_ignored_while_busy() {
    let mut screen = ready_screen();

    assert!(screen.begin_capture().is_ok());
    assert_eq!(
        screen.begin_capture(),
        Err(Rejected::Busy(Operation::Capturing))
    );
    assert_eq!(
        screen.toggle_facing(),
        Err(Rejected::Busy(Operation::Capturing))
    );

    screen.finish_capture(Ok(ImageRef::new("/cache/capture-1.jpg")));
    assert!(screen.begin_save().is_ok());
    assert_eq!(screen.begin_save(), Err(Rejected::Busy(Operation::Saving)));
    assert_eq!(screen.retake(), Err(Rejected::Busy(Operation::Saving)));
}

#[test]
fn test_full_capture_and_save_scenario() {
    let provider = FakePermissions::new(Unknown, Ok(Granted), Ok(Granted));
    let image = ImageRef::new("/cache/capture-42.jpg");
    let camera = FakeCamera::returning(Ok(image.clone()));
    let gallery = FakeGallery::new(false);

    let mut screen = Screen::default();
    assert_eq!(screen.gate(), Gate::Checking);

    screen.apply_permissions(run_permission_flow(&provider, false));
    assert_eq!(screen.gate(), Gate::Ready);

    screen.mark_camera_ready();
    take_picture(&mut screen, &camera);
    assert_eq!(screen.pending_image(), Some(&image));

    assert_eq!(save(&mut screen, &gallery), Some(image.clone()));
    assert_eq!(screen.capture_state(), &CaptureState::Preview);
    assert_eq!(gallery.saved.lock().unwrap().as_slice(), &[image]);
}

#[test]
fn test_permission_flow_skips_granted_camera() {
    let provider = FakePermissions::new(Granted, Ok(Denied), Ok(Granted));

    let update = run_permission_flow(&provider, false);

    assert_eq!(update.camera, Some(Granted));
    assert_eq!(update.media_library, Some(Granted));
    assert_eq!(provider.camera_requests(), 0);
}

#[test]
fn test_permission_flow_forced_asks_again() {
    let provider = FakePermissions::new(Denied, Ok(Granted), Ok(Granted));

    let update = run_permission_flow(&provider, true);

    assert_eq!(update.camera, Some(Granted));
    assert_eq!(provider.camera_requests(), 1);
}

#[test]
fn test_permission_flow_errors_leave_state_unchanged() {
    let provider = FakePermissions::new(
        Unknown,
        Err(PermissionError::Portal("no portal".to_string())),
        Err(PermissionError::Probe("no home".to_string())),
    );

    let update = run_permission_flow(&provider, false);
    assert_eq!(update, PermissionUpdate::default());

    let mut screen = Screen::default();
    screen.apply_permissions(update);
    assert_eq!(screen.gate(), Gate::Checking);
}

#[test]
fn test_denied_then_granted_on_retry() {
    let mut screen = Screen::default();
    screen.apply_permissions(run_permission_flow(
        &FakePermissions::new(Unknown, Ok(Denied), Ok(Granted)),
        false,
    ));
    assert_eq!(screen.gate(), Gate::Denied);

    screen.apply_permissions(run_permission_flow(
        &FakePermissions::new(Denied, Ok(Granted), Ok(Granted)),
        true,
    ));
    assert_eq!(screen.gate(), Gate::Ready);
}
