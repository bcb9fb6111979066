use yew::prelude::*;

const ITEM_PX: f64 = 96.0;

#[derive(Properties, PartialEq, Clone)]
pub struct ReelViewProps {
    pub items: Vec<String>,
    pub visible: bool,
    pub spinning: bool,
    pub spin_secs: f64,
    /// Changes on every spin so the strip animation restarts.
    pub spin_id: u32,
    pub winner: Option<String>,
}

#[function_component(ReelView)]
pub fn reel_view(props: &ReelViewProps) -> Html {
    if !props.visible || props.items.is_empty() {
        return html! { <div id="reel" class="hidden" style={format!("height:{ITEM_PX}px;")}></div> };
    }
    // the winner is the last item; the strip ends with it in the window
    let end = -(props.items.len() as f64 - 1.0) * ITEM_PX;
    let strip_style = if props.spinning {
        format!(
            "--reel-end:{end}px; animation:reel-spin {}s cubic-bezier(0.15, 0.6, 0.25, 1) forwards;",
            props.spin_secs
        )
    } else {
        format!("transform:translateY({end}px);")
    };
    html! {<div id="reel" aria-label={props.winner.clone()} style={format!("height:{ITEM_PX}px; min-width:420px; overflow:hidden; border:2px solid #30363d; border-radius:12px; background:#161b22; z-index:10;")}>
        <div key={props.spin_id.to_string()} style={strip_style}>
            { for props.items.iter().map(|name| html!{
                <div style={format!("height:{ITEM_PX}px; line-height:{ITEM_PX}px; font-size:40px; font-weight:700; text-align:center; white-space:nowrap; overflow:hidden; text-overflow:ellipsis; padding:0 16px;")}>{ name.clone() }</div>
            }) }
        </div>
    </div>}
}
