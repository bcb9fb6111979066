use gloo::dialogs;
use web_sys::{Element, HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::model::SettingsDraft;

#[derive(Properties, PartialEq, Clone)]
pub struct SettingsModalProps {
    /// Values captured when the panel opened; nothing applies until Save.
    pub draft: SettingsDraft,
    pub on_save: Callback<SettingsDraft>,
    pub on_close: Callback<()>,
    pub on_clear_storage: Callback<()>,
}

#[function_component]
pub fn SettingsModal(props: &SettingsModalProps) -> Html {
    let panel_ref = use_node_ref();
    let names_ref = use_node_ref();
    let remove_ref = use_node_ref();
    let sound_ref = use_node_ref();

    let reset_scroll = {
        let panel_ref = panel_ref.clone();
        move || {
            if let Some(panel) = panel_ref.cast::<Element>() {
                panel.set_scroll_top(0);
            }
        }
    };

    let close_cb = {
        let cb = props.on_close.clone();
        let reset_scroll = reset_scroll.clone();
        Callback::from(move |_| {
            reset_scroll();
            cb.emit(())
        })
    };
    let save_cb = {
        let cb = props.on_save.clone();
        let fallback = props.draft.clone();
        let names_ref = names_ref.clone();
        let remove_ref = remove_ref.clone();
        let sound_ref = sound_ref.clone();
        let reset_scroll = reset_scroll.clone();
        Callback::from(move |_| {
            let draft = SettingsDraft {
                names_text: names_ref
                    .cast::<HtmlTextAreaElement>()
                    .map(|t| t.value())
                    .unwrap_or_else(|| fallback.names_text.clone()),
                remove_winner: remove_ref
                    .cast::<HtmlInputElement>()
                    .map(|i| i.checked())
                    .unwrap_or(fallback.remove_winner),
                sound_enabled: sound_ref
                    .cast::<HtmlInputElement>()
                    .map(|i| i.checked())
                    .unwrap_or(fallback.sound_enabled),
            };
            reset_scroll();
            cb.emit(draft)
        })
    };
    let clear_cb = {
        let cb = props.on_clear_storage.clone();
        Callback::from(move |_| {
            if dialogs::confirm(
                "This will WIPE every recorded winner and restart from the first prize. Are you sure?",
            ) {
                reset_scroll();
                cb.emit(());
            }
        })
    };

    html! {<div id="settings" style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:50;">
        <div id="settings-panel" ref={panel_ref} style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; min-width:340px; max-width:480px; max-height:80vh; overflow:auto; display:flex; flex-direction:column; gap:14px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h3 style="margin:0; font-size:18px;">{"Settings"}</h3>
                <button id="settings-close" onclick={close_cb.clone()} style="padding:4px 8px;">{"Discard and close"}</button>
            </div>
            <label style="display:flex; flex-direction:column; gap:6px;">
                <span>{"Names (one per line)"}</span>
                <textarea id="name-list" ref={names_ref} rows="12" value={props.draft.names_text.clone()} style="width:100%; background:#0e1116; color:#e6edf3; border:1px solid #30363d; border-radius:6px;" />
            </label>
            <div style="display:flex; flex-direction:column; gap:10px;">
                <label style="display:flex; align-items:center; gap:8px; cursor:pointer;">
                    <input id="remove-from-list" ref={remove_ref} type="checkbox" checked={props.draft.remove_winner} />
                    <span>{"Remove winner from list"}</span>
                </label>
                <label style="display:flex; align-items:center; gap:8px; cursor:pointer;">
                    <input id="enable-sound" ref={sound_ref} type="checkbox" checked={props.draft.sound_enabled} />
                    <span>{"Enable sound"}</span>
                </label>
            </div>
            <div style="display:flex; gap:8px; flex-wrap:wrap;">
                <button id="settings-storage-clear" onclick={clear_cb} style="background:#f85149; border:1px solid #b62324; color:#fff; flex:1;">{"Clear Storage"}</button>
                <button id="settings-save" onclick={save_cb} style="flex:0 0 auto;">{"Save"}</button>
            </div>
            <div style="font-size:11px; line-height:1.4; opacity:0.7;">{"Clear Storage removes the saved winner list and prize position. The name list is kept."}</div>
        </div>
    </div>}
}
