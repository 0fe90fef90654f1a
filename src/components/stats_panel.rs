use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct StatsPanelProps {
    pub score: u32,
    pub spawned: u32,
    pub hit_rate: u32,
    pub level: u8,
}

#[function_component]
pub fn StatsPanel(props: &StatsPanelProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px;"; // label | value
    let label_style = "flex:1; font-weight:500;";
    let value_style =
        "min-width:56px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    let row = |label: &str, value: String, color: &str| {
        html! {
            <div style={row_style}>
                <span style={format!("{} color:{};", label_style, color)}>{ label.to_string() }</span>
                <span style={format!("{} color:{};", value_style, color)}>{ value }</span>
            </div>
        }
    };
    html! {
        <div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:180px; display:flex; flex-direction:column; gap:6px; font-size:14px;">
            { row("Score", props.score.to_string(), "#3fb950") }
            { row("Spawned", props.spawned.to_string(), "#58a6ff") }
            { row("Hit rate", format!("{}%", props.hit_rate), "#d4af37") }
            { row("Level", props.level.to_string(), "#c9d1d9") }
        </div>
    }
}
