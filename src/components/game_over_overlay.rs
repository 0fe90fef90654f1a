use reaction_grid::RoundSummary;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct GameOverOverlayProps {
    pub summary: Option<RoundSummary>,
    pub restart: Callback<()>,
    pub close: Callback<()>,
}

#[function_component]
pub fn GameOverOverlay(props: &GameOverOverlayProps) -> Html {
    let Some(summary) = props.summary else {
        return html! {};
    };
    let restart_cb = props.restart.clone();
    let restart_btn = Callback::from(move |_| restart_cb.emit(()));
    let close_btn = {
        let cb = props.close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.85); border:2px solid #58a6ff; padding:24px 32px; border-radius:12px; text-align:center; min-width:320px; z-index:50;">
            <h2 style="margin:0 0 12px 0; color:#58a6ff;">{"Time's up"}</h2>
            <p style="margin:4px 0;">{ format!("Score: {}", summary.score) }</p>
            <p style="margin:4px 0;">{ format!("Blocks spawned: {}", summary.total_spawned) }</p>
            <p style="margin:4px 0;">{ format!("Hit rate: {}%", summary.hit_rate) }</p>
            <div style="margin-top:16px; display:flex; gap:12px; justify-content:center;">
                <button onclick={restart_btn}>{"Play again"}</button>
                <button onclick={close_btn}>{"Close"}</button>
            </div>
        </div>
    }
}
