use crate::app::App;

mod app;
mod components;
mod logging;
mod reader;
mod storage;

fn main() {
    logging::init();
    yew::Renderer::<App>::new().render();
}
