use std::cell::RefCell;
use std::rc::Rc;

use web_sys::HtmlCanvasElement;
use yew::functional::UseStateSetter;
use yew::prelude::*;

use super::{
    controls_panel::ControlsPanel, prize_banner::PrizeBanner, reel_view::ReelView,
    settings_modal::SettingsModal, winner_modal::WinnerModal,
};
use crate::audio::WebAudioCues;
use crate::confetti::ConfettiCanvas;
use crate::error::DrawError;
use crate::model::{DrawOutcome, DrawView, MAX_REEL_ITEMS, PrizeCatalog, SettingsDraft};
use crate::state::{
    BrowserStorage, Celebration, DrawOrchestrator, DrawParts, KeyValueStore, MemoryStore,
    PrizeSequencer, ReelSignals, SlotReel, WinnerLedger,
};
use crate::util::{cerror, cwarn};
use crate::web::{self, RafScheduler};

type Session = Rc<RefCell<Option<DrawOrchestrator>>>;

const APP_CSS: &str = r#"
@keyframes reel-spin {
    from { transform: translateY(0); }
    to { transform: translateY(var(--reel-end)); }
}
button:disabled { opacity: 0.45; cursor: not-allowed; }
"#;

/// Wires the browser collaborators into an orchestrator. Fails before anything is started.
fn boot(
    canvas_ref: &NodeRef,
    on_label: Callback<String>,
    on_overlay: Callback<bool>,
) -> Result<DrawOrchestrator, DrawError> {
    let catalog = PrizeCatalog::bundled()?;
    let canvas = canvas_ref
        .cast::<HtmlCanvasElement>()
        .ok_or(DrawError::MissingAnchor("confetti-canvas"))?;
    let scheduler = RafScheduler::new();
    let confetti = ConfettiCanvas::new(canvas)?;

    let store: Rc<dyn KeyValueStore> = match BrowserStorage::open() {
        Some(s) => Rc::new(s),
        None => {
            cwarn("localStorage unavailable; winners will not survive a reload");
            Rc::new(MemoryStore::new())
        }
    };
    let signals = ReelSignals::new();
    let reel = SlotReel::new(
        MAX_REEL_ITEMS,
        Rc::new(signals.clone()),
        Box::new(web::random),
    );
    let celebration = Celebration::new(
        Box::new(scheduler),
        Box::new(confetti),
        on_overlay,
        Box::new(web::random),
        Box::new(web::viewport_width),
    );
    Ok(DrawOrchestrator::new(DrawParts {
        reel: Box::new(reel),
        signals,
        audio: Rc::new(WebAudioCues::new()),
        celebration,
        sequencer: PrizeSequencer::new(catalog, store.clone(), on_label),
        ledger: WinnerLedger::new(store),
        detach: Rc::new(web::detach),
    }))
}

/// Runs `f` against the live session, logs a rejected action, and republishes the view.
fn with_session<T>(
    session: &Session,
    view: &UseStateSetter<DrawView>,
    f: impl FnOnce(&mut DrawOrchestrator) -> Result<T, DrawError>,
) -> Option<T> {
    let mut guard = session.borrow_mut();
    let orch = guard.as_mut()?;
    let out = match f(orch) {
        Ok(v) => Some(v),
        Err(e) => {
            cerror(&format!("draw action rejected: {e}"));
            None
        }
    };
    view.set(orch.view());
    out
}

#[function_component(App)]
pub fn app() -> Html {
    let canvas_ref = use_node_ref();
    let session: Session = use_mut_ref(|| None::<DrawOrchestrator>);
    let label = use_state(String::new);
    let overlay = use_state(|| false);
    let view = use_state(DrawView::default);
    let settings = use_state(|| None::<SettingsDraft>);
    let winners = use_state(|| None::<String>);
    let fatal = use_state(|| None::<String>);
    let spin_id = use_state(|| 0u32);
    let fullscreen_ok = use_state(web::fullscreen_supported);

    // Boot once the canvas is mounted
    {
        let canvas_ref = canvas_ref.clone();
        let session = session.clone();
        let label = label.setter();
        let overlay = overlay.setter();
        let view = view.setter();
        let fatal = fatal.setter();
        use_effect_with((), move |_| {
            let booted = boot(
                &canvas_ref,
                Callback::from(move |l: String| label.set(l)),
                Callback::from(move |v: bool| overlay.set(v)),
            );
            match booted {
                Ok(orch) => {
                    view.set(orch.view());
                    *session.borrow_mut() = Some(orch);
                }
                Err(e) => {
                    cerror(&format!("lucky draw not started: {e}"));
                    fatal.set(Some(e.to_string()));
                }
            }
            move || {
                session.borrow_mut().take();
            }
        });
    }

    let on_draw = {
        let session = session.clone();
        let view = view.setter();
        let settings = settings.setter();
        let spin_id = spin_id.clone();
        Callback::from(move |_| {
            match with_session(&session, &view, |o| o.request_draw()) {
                Some(DrawOutcome::Spinning { duration_secs }) => {
                    spin_id.set(*spin_id + 1);
                    let session = session.clone();
                    let view = view.clone();
                    web::after((duration_secs * 1000.0).round() as u32, move || {
                        with_session(&session, &view, |o| o.complete_spin());
                    });
                }
                Some(DrawOutcome::NeedsNames(draft)) => settings.set(Some(draft)),
                None => {}
            }
        })
    };
    let on_confirm = {
        let session = session.clone();
        let view = view.setter();
        Callback::from(move |_| {
            with_session(&session, &view, |o| o.confirm().map(|_| ()));
        })
    };
    let on_open_settings = {
        let session = session.clone();
        let view = view.setter();
        let settings = settings.setter();
        Callback::from(move |_| {
            if let Some(draft) = with_session(&session, &view, |o| o.open_settings()) {
                settings.set(Some(draft));
            }
        })
    };
    let on_save_settings = {
        let session = session.clone();
        let view = view.setter();
        let settings = settings.setter();
        Callback::from(move |draft: SettingsDraft| {
            with_session(&session, &view, |o| o.save_settings(&draft));
            settings.set(None);
        })
    };
    let on_close_settings = {
        let settings = settings.setter();
        Callback::from(move |_| settings.set(None))
    };
    let on_clear_storage = {
        let session = session.clone();
        let view = view.setter();
        let settings = settings.setter();
        Callback::from(move |_| {
            with_session(&session, &view, |o| o.reset());
            settings.set(None);
        })
    };
    let on_open_winners = {
        let session = session.clone();
        let view = view.setter();
        let winners = winners.setter();
        Callback::from(move |_| {
            winners.set(with_session(&session, &view, |o| Ok(o.winner_csv())));
        })
    };
    let on_close_winners = {
        let winners = winners.setter();
        Callback::from(move |_| winners.set(None))
    };
    let on_fullscreen = Callback::from(|_| web::toggle_fullscreen());

    let body = if let Some(msg) = &*fatal {
        html! {
            <div style="margin:auto; max-width:480px; padding:24px; border:2px solid #f85149; border-radius:12px; background:rgba(0,0,0,0.85); text-align:center;">
                <h2 style="margin:0 0 8px 0; color:#f85149;">{"Lucky draw could not start"}</h2>
                <p style="margin:0; font-size:13px; opacity:0.8;">{ msg.clone() }</p>
            </div>
        }
    } else {
        html! {
            <>
                <PrizeBanner label={(*label).clone()} />
                <ReelView
                    items={view.reel_items.clone()}
                    visible={view.reel_visible}
                    spinning={view.spinning}
                    spin_secs={view.spin_secs}
                    spin_id={*spin_id}
                    winner={view.winner.clone()}
                />
                <ControlsPanel
                    controls={view.controls}
                    fullscreen={*fullscreen_ok}
                    on_draw={on_draw}
                    on_confirm={on_confirm}
                    on_settings={on_open_settings}
                    on_winners={on_open_winners}
                    on_fullscreen={on_fullscreen}
                />
            </>
        }
    };

    html! {
        <div id="lucky-draw" data-state={format!("{:?}", view.lock)} style="position:relative; width:100vw; height:100vh; display:flex; flex-direction:column; align-items:center; justify-content:center; gap:24px; background:#0e1116; color:#e6edf3; overflow:hidden;">
            <style>{ APP_CSS }</style>
            <div id="sunburst" style={format!("position:absolute; inset:-50%; background:repeating-conic-gradient(rgba(252,255,66,0.12) 0deg 10deg, transparent 10deg 20deg); pointer-events:none; display:{};", if *overlay { "block" } else { "none" })}></div>
            <canvas ref={canvas_ref} id="confetti-canvas" style="position:fixed; inset:0; width:100vw; height:100vh; pointer-events:none; z-index:40;"></canvas>
            { body }
            {
                if let Some(draft) = &*settings {
                    html! { <SettingsModal
                        draft={draft.clone()}
                        on_save={on_save_settings}
                        on_close={on_close_settings}
                        on_clear_storage={on_clear_storage}
                    /> }
                } else { html! {} }
            }
            {
                if let Some(csv) = &*winners {
                    html! { <WinnerModal csv={csv.clone()} on_close={on_close_winners} /> }
                } else { html! {} }
            }
        </div>
    }
}
