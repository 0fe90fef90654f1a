use reaction_grid::config::{MAX_LEVEL, MIN_LEVEL};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub level: u8,
    pub on_level: Callback<u8>,
    pub on_reset: Callback<()>,
    pub on_toggle_fullscreen: Callback<()>,
}

#[function_component]
pub fn ControlsPanel(props: &ControlsPanelProps) -> Html {
    let reset_cb = {
        let cb = props.on_reset.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let fullscreen_cb = {
        let cb = props.on_toggle_fullscreen.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let level_buttons = (MIN_LEVEL..=MAX_LEVEL).map(|lvl| {
        let cb = props.on_level.clone();
        let selected = lvl == props.level;
        let style = if selected {
            "padding:2px 8px; background:#1f6feb; border:1px solid #58a6ff; color:#fff;"
        } else {
            "padding:2px 8px;"
        };
        html! { <button style={style} onclick={Callback::from(move |_| cb.emit(lvl))}>{ lvl.to_string() }</button> }
    });
    html! {<div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:200px; display:flex; flex-direction:column; gap:6px;">
        <div style="display:flex; align-items:center; gap:4px;">
            <span style="font-size:12px; opacity:0.8; margin-right:4px;">{"Difficulty"}</span>
            { for level_buttons }
        </div>
        <div style="display:flex; gap:6px;">
            <button onclick={reset_cb}>{"Reset"}</button>
            <button onclick={fullscreen_cb}>{"Fullscreen"}</button>
        </div>
        <div style="font-size:11px; opacity:0.7;">{"Hotkey: Space start/stop. Changing difficulty mid-round restarts it."}</div>
    </div>}
}
