use iced::widget::{container, text};
use iced::{Border, Color, Element};

use crate::Message;

/// How long a toast stays on screen, in seconds
pub const TOAST_SECONDS: u64 = 4;

/// Flavor of a transient notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A transient notification shown after user-visible outcomes:
/// processing success/failure, oversized rejection, download, deletion.
#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// Render a toast as a pill-shaped banner
pub fn view(toast: &Toast) -> Element<'_, Message> {
    let background = match toast.kind {
        ToastKind::Success => Color::from_rgb(0.13, 0.55, 0.30),
        ToastKind::Error => Color::from_rgb(0.75, 0.22, 0.22),
    };

    container(text(&toast.message).size(14))
        .padding([8.0, 16.0])
        .style(move |_theme| container::Style {
            background: Some(background.into()),
            text_color: Some(Color::WHITE),
            border: Border {
                radius: 16.0.into(),
                ..Border::default()
            },
            ..container::Style::default()
        })
        .into()
}
