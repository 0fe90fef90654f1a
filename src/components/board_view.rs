use reaction_grid::Board;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct BoardViewProps {
    pub board: Board,
    pub cell_px: u32,
    /// Full lifetime at the current level, used to fade blocks as they age.
    pub lifetime_ms: u32,
    pub on_click: Callback<usize>,
}

#[function_component]
pub fn BoardView(props: &BoardViewProps) -> Html {
    let grid_style = format!(
        "display:grid; grid-template-columns:repeat({}, {}px); grid-auto-rows:{}px; gap:2px; padding:6px; background:#161b22; border:1px solid #30363d; border-radius:8px;",
        props.board.cols, props.cell_px, props.cell_px
    );
    let cells = props.board.cells.iter().map(|c| {
        let id = c.id;
        let cb = props.on_click.clone();
        let onclick = Callback::from(move |_: MouseEvent| cb.emit(id));
        let style = if c.animating {
            "background:#3fb950; transform:scale(0.2); opacity:0; transition:transform 200ms ease-in, opacity 200ms ease-in;".to_string()
        } else if c.active {
            let life = c.time_left_ms as f64 / props.lifetime_ms.max(1) as f64;
            format!("background:#f0883e; opacity:{:.2}; cursor:pointer;", 0.35 + 0.65 * life.min(1.0))
        } else {
            "background:#0e1116;".to_string()
        };
        html! { <div key={id.to_string()} onclick={onclick} style={format!("border-radius:4px; {}", style)}></div> }
    });
    html! { <div style={grid_style}>{ for cells }</div> }
}
