// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! Exactly one of four layouts is shown: the three permission gate screens
//! or the capture UI (live preview or review).

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;
use crate::screen::{CaptureState, Gate};
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, ContentFit, Length};
use cosmic::widget;

/// Semi-transparent dark background for the control row over the preview
fn controls_container_style(_theme: &cosmic::Theme) -> widget::container::Style {
    widget::container::Style {
        background: Some(Background::Color(Color::from_rgba(
            0.0,
            0.0,
            0.0,
            ui::OVERLAY_BACKGROUND_ALPHA,
        ))),
        ..Default::default()
    }
}

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        match self.screen.gate() {
            Gate::Checking => centered(widget::text::body(fl!("checking-permissions"))),
            Gate::Denied => centered(
                widget::column()
                    .push(widget::text::body(fl!("no-camera-access")))
                    .push(
                        widget::button::suggested(fl!("grant-permission"))
                            .on_press(Message::GrantPermission),
                    )
                    .spacing(cosmic::theme::spacing().space_s)
                    .align_x(Alignment::Center),
            ),
            Gate::RequestingMedia => {
                centered(widget::text::body(fl!("requesting-media-permission")))
            }
            Gate::Ready => match self.screen.capture_state() {
                CaptureState::Preview => self.build_preview(),
                CaptureState::Reviewing { .. } => self.build_review(),
            },
        }
    }

    /// Live feed with Take Picture, Switch Camera and Flash controls
    fn build_preview(&self) -> Element<'_, Message> {
        let idle = self.screen.in_flight().is_none();

        let feed: Element<'_, Message> = match &self.preview {
            Some(handle) => widget::image::Image::new(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => centered(widget::text::body(fl!("waiting-for-camera"))),
        };

        let flash_label = if self.screen.settings().flash.is_on() {
            fl!("flash-on")
        } else {
            fl!("flash-off")
        };

        let controls = widget::row()
            .push(
                widget::button::suggested(fl!("take-picture"))
                    .on_press_maybe(idle.then_some(Message::TakePicture)),
            )
            .push(
                widget::button::standard(fl!("switch-camera"))
                    .on_press_maybe(idle.then_some(Message::SwitchCamera)),
            )
            .push(
                widget::button::standard(flash_label)
                    .on_press_maybe(idle.then_some(Message::ToggleFlash)),
            )
            .spacing(ui::CONTROLS_SPACING)
            .align_y(Alignment::Center);

        with_controls(feed, controls.into())
    }

    /// Captured still with Retake and Save to Gallery controls
    fn build_review(&self) -> Element<'_, Message> {
        let idle = self.screen.in_flight().is_none();

        let still: Element<'_, Message> = match &self.review {
            Some(handle) => widget::image::Image::new(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => widget::Space::new(Length::Fill, Length::Fill).into(),
        };

        let controls = widget::row()
            .push(
                widget::button::standard(fl!("retake"))
                    .on_press_maybe(idle.then_some(Message::Retake)),
            )
            .push(
                widget::button::suggested(fl!("save-to-gallery"))
                    .on_press_maybe(idle.then_some(Message::SaveToGallery)),
            )
            .spacing(ui::CONTROLS_SPACING)
            .align_y(Alignment::Center);

        with_controls(still, controls.into())
    }
}

/// Center a single element in the window
fn centered<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    widget::container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center(Length::Fill)
        .into()
}

/// Stack content above a centered control row on a black background
fn with_controls<'a>(
    content: Element<'a, Message>,
    controls: Element<'a, Message>,
) -> Element<'a, Message> {
    let control_bar = widget::container(controls)
        .width(Length::Fill)
        .center_x(Length::Fill)
        .padding(ui::CONTROLS_PADDING)
        .style(controls_container_style);

    widget::container(
        widget::column()
            .push(content)
            .push(control_bar)
            .width(Length::Fill)
            .height(Length::Fill),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .style(|_theme| widget::container::Style {
        background: Some(Background::Color(Color::BLACK)),
        ..Default::default()
    })
    .into()
}
