use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct TimeDisplayProps {
    /// Already formatted as M:SS.
    pub time_left: String,
    pub running: bool,
    pub on_toggle_run: Callback<()>,
}

#[function_component(TimeDisplay)]
pub fn time_display(props: &TimeDisplayProps) -> Html {
    let toggle_cb = {
        let cb = props.on_toggle_run.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let label = if props.running { "Stop" } else { "Start" };
    html! {<div style="display:flex; flex-direction:column; align-items:center; gap:6px;">
        <div style="font-size:28px; font-weight:600; font-variant-numeric:tabular-nums;">{ props.time_left.clone() }</div>
        <button onclick={toggle_cb} style="padding:4px 14px; font-size:13px;">{ label }</button>
    </div>}
}
