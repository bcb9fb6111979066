use yew::prelude::*;

use crate::model::Controls;

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub controls: Controls,
    /// Fullscreen button is only shown when the browser supports it.
    pub fullscreen: bool,
    pub on_draw: Callback<()>,
    pub on_confirm: Callback<()>,
    pub on_settings: Callback<()>,
    pub on_winners: Callback<()>,
    pub on_fullscreen: Callback<()>,
}

#[function_component]
pub fn ControlsPanel(props: &ControlsPanelProps) -> Html {
    let draw_cb = {
        let cb = props.on_draw.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let confirm_cb = {
        let cb = props.on_confirm.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let settings_cb = {
        let cb = props.on_settings.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let winners_cb = {
        let cb = props.on_winners.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let fullscreen_cb = {
        let cb = props.on_fullscreen.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let c = props.controls;
    html! {<div style="display:flex; gap:12px; align-items:center; z-index:10;">
        <button id="draw-button" onclick={draw_cb} disabled={!c.draw} style="padding:12px 32px; font-size:20px; font-weight:600;">{"Draw"}</button>
        <button id="confirm-button" onclick={confirm_cb} disabled={!c.confirm} style="padding:12px 32px; font-size:20px; font-weight:600;">{"Confirm"}</button>
        <div style="position:absolute; top:12px; right:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; display:flex; flex-direction:column; gap:6px;">
            <button id="settings-button" onclick={settings_cb} disabled={!c.settings}>{"Settings"}</button>
            <button id="winner-button" onclick={winners_cb}>{"Winners"}</button>
            { if props.fullscreen { html!{ <button id="fullscreen-button" onclick={fullscreen_cb}>{"Fullscreen"}</button> } } else { html!{} } }
        </div>
    </div>}
}
