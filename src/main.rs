mod components;

use components::app::App;

fn main() {
    reaction_grid::util::init_console_log(log::LevelFilter::Debug);
    yew::Renderer::<App>::new().render();
}
