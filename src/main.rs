mod audio;
mod components;
mod confetti;
mod error;
mod model;
mod state;
mod util;
mod web;

fn main() {
    yew::Renderer::<components::app::App>::new().render();
}
