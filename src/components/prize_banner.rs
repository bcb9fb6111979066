use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct PrizeBannerProps {
    pub label: String,
}

#[function_component(PrizeBanner)]
pub fn prize_banner(props: &PrizeBannerProps) -> Html {
    html! {<div id="prize" style="font-size:32px; font-weight:700; text-align:center; z-index:10;">
        <div>{ props.label.clone() }</div>
    </div>}
}
