//! Upload dashboard: root module wiring the Yew `Component` implementation
//! with submodules for state, update logic, view rendering, and helpers.
//!
//! Responsibilities
//! - Re-export the component and its message type.
//! - Provide the `Component` implementation that delegates to `update::update`
//!   and `view::view`.
//! - On first render, greet a restored session so the user knows their files
//!   survived the reload.

use yew::prelude::*;

mod helpers;
mod messages;
mod state;
mod update;
mod view;
mod wizard;

use helpers::show_toast;
pub use messages::Msg;
pub use state::UploadDashboard;

impl Component for UploadDashboard {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        UploadDashboard::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, _ctx: &Context<Self>, first_render: bool) {
        if first_render {
            let restored = self.orchestrator.files().len();
            if restored > 0 {
                show_toast(&format!("Restored {} file(s) from this session.", restored));
            }
        }
    }
}
