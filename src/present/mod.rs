//! Presentation of the login surface relative to a host UI anchor.
//!
//! Handles are opaque ids the host maps back onto its own widgets.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The authenticator's login UI, ready to be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceHandle(pub u64);

/// A full-screen view controller that can host a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControllerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarButtonHandle(pub u64);

/// Area of a view, in that view's coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Host UI element a login is launched from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginAnchor {
    /// Phone-style: cover the controller with a modal.
    Controller(ControllerHandle),
    /// Tablet-style: popover pointing at `rect` inside `view`.
    View { view: ViewHandle, rect: Rect },
    /// Tablet-style: popover hanging off a toolbar button.
    BarButton(BarButtonHandle),
}

/// How a login surface is put on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presentation {
    Modal { parent: ControllerHandle },
    PopoverFromRect { view: ViewHandle, rect: Rect },
    PopoverFromBarButton { item: BarButtonHandle },
}

impl Presentation {
    pub fn is_modal(&self) -> bool {
        matches!(self, Self::Modal { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Modal { .. } => "modal",
            Self::PopoverFromRect { .. } => "popover_rect",
            Self::PopoverFromBarButton { .. } => "popover_bar_button",
        }
    }

    /// Put `surface` on screen; the returned guard takes it down again.
    pub fn present<'a>(
        self,
        presenter: &'a dyn LoginPresenter,
        surface: SurfaceHandle,
    ) -> Result<PresentedLogin<'a>> {
        match self {
            Self::Modal { parent } => presenter.present_modal(parent, surface)?,
            Self::PopoverFromRect { view, rect } => {
                presenter.present_popover_from_rect(view, rect, surface)?
            }
            Self::PopoverFromBarButton { item } => {
                presenter.present_popover_from_bar_button(item, surface)?
            }
        }
        Ok(PresentedLogin {
            presenter,
            presentation: self,
            surface,
            dismissed: false,
        })
    }
}

impl From<LoginAnchor> for Presentation {
    fn from(anchor: LoginAnchor) -> Self {
        match anchor {
            LoginAnchor::Controller(parent) => Self::Modal { parent },
            LoginAnchor::View { view, rect } => Self::PopoverFromRect { view, rect },
            LoginAnchor::BarButton(item) => Self::PopoverFromBarButton { item },
        }
    }
}

/// Host UI toolkit operations used to show and hide the login surface.
///
/// Presentations are animated. Popovers may point in any arrow direction.
pub trait LoginPresenter: Send + Sync {
    fn present_modal(&self, parent: ControllerHandle, surface: SurfaceHandle) -> Result<()>;

    fn present_popover_from_rect(
        &self,
        view: ViewHandle,
        rect: Rect,
        surface: SurfaceHandle,
    ) -> Result<()>;

    fn present_popover_from_bar_button(
        &self,
        item: BarButtonHandle,
        surface: SurfaceHandle,
    ) -> Result<()>;

    /// Take down the modal `parent` is showing.
    fn dismiss_modal(&self, parent: ControllerHandle);

    /// Take down the popover showing `surface`.
    fn dismiss_popover(&self, surface: SurfaceHandle);
}

/// A login surface currently on screen. Dismissed on drop if not before.
pub struct PresentedLogin<'a> {
    presenter: &'a dyn LoginPresenter,
    presentation: Presentation,
    surface: SurfaceHandle,
    dismissed: bool,
}

impl PresentedLogin<'_> {
    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    pub fn dismiss(mut self) {
        self.dismiss_once();
    }

    fn dismiss_once(&mut self) {
        if self.dismissed {
            return;
        }
        self.dismissed = true;
        match self.presentation {
            Presentation::Modal { parent } => self.presenter.dismiss_modal(parent),
            Presentation::PopoverFromRect { .. } | Presentation::PopoverFromBarButton { .. } => {
                self.presenter.dismiss_popover(self.surface)
            }
        }
    }
}

impl Drop for PresentedLogin<'_> {
    fn drop(&mut self) {
        self.dismiss_once();
    }
}

impl std::fmt::Debug for PresentedLogin<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentedLogin")
            .field("presentation", &self.presentation)
            .field("surface", &self.surface)
            .field("dismissed", &self.dismissed)
            .finish()
    }
}
