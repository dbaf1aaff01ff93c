//! Module library picker: root module wiring the Yew `Component`
//! implementation with submodules for state, update logic, view rendering,
//! and helpers.
//!
//! Responsibilities
//! - Re-export the component surface (`Msg`, `LibraryProps`,
//!   `LibraryComponent`).
//! - Provide the `Component` implementation that delegates to
//!   `update::update` and `view::view`.
//!
//! The component reacts to four user events, each triggering exactly one
//! action: template-course selection (structure fetch), "Copy this module"
//! (target-sections fetch), copy-form submission (the copy call), and
//! cancel (local reset). A successful copy shows a toast and reloads the
//! page after a short delay.

mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

use yew::prelude::*;

pub use messages::Msg;
pub use props::LibraryProps;
pub use state::LibraryComponent;

impl Component for LibraryComponent {
    type Message = Msg;
    type Properties = LibraryProps;

    fn create(_ctx: &Context<Self>) -> Self {
        LibraryComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }
}
