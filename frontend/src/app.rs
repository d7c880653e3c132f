use crate::components::upload::UploadDashboard;
use yew::{html, Component, Context, Html};

pub struct App;

impl Component for App {
    type Message = ();
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <main class="app">
                <h1>{"Upload your data"}</h1>
                <UploadDashboard />
            </main>
        }
    }
}
