use web_sys::Element;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct WinnerModalProps {
    /// CSV export of the winner ledger.
    pub csv: String,
    pub on_close: Callback<()>,
}

#[function_component]
pub fn WinnerModal(props: &WinnerModalProps) -> Html {
    let panel_ref = use_node_ref();
    let close_cb = {
        let cb = props.on_close.clone();
        let panel_ref = panel_ref.clone();
        Callback::from(move |_| {
            if let Some(panel) = panel_ref.cast::<Element>() {
                panel.set_scroll_top(0);
            }
            cb.emit(())
        })
    };
    html! {<div id="winner" style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:50;">
        <div id="winner-panel" ref={panel_ref} style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; min-width:340px; max-width:560px; max-height:80vh; overflow:auto; display:flex; flex-direction:column; gap:14px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h3 style="margin:0; font-size:18px;">{"Winners"}</h3>
                <button id="winner-close" onclick={close_cb} style="padding:4px 8px;">{"Close"}</button>
            </div>
            <textarea id="winner-list" readonly={true} rows="16" value={props.csv.clone()} style="width:100%; font-family:monospace; font-size:13px; background:#0e1116; color:#e6edf3; border:1px solid #30363d; border-radius:6px;" />
            <div style="font-size:11px; line-height:1.4; opacity:0.7;">{"Copy this list into a spreadsheet; columns are prize number, prize and winner."}</div>
        </div>
    </div>}
}
