use num_format::{Locale, ToFormattedString};
use pastel_2048::{
    input::{key_command, swipe_direction, Command},
    session::GameSession,
    store::{parse_best_score, BestScoreStore, StoreError, BEST_SCORE_KEY},
    Tile,
};
use rand::{rngs::StdRng, SeedableRng};
use web_sys::{HtmlElement, Storage};
use yew::prelude::*;

/// Best score in `window.localStorage`.
struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<Storage, StoreError> {
        web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".into()))
    }
}

impl BestScoreStore for LocalStorageStore {
    fn load(&self) -> Result<u32, StoreError> {
        let raw = Self::storage()?
            .get_item(BEST_SCORE_KEY)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?;
        parse_best_score(raw.as_deref())
    }

    fn save(&mut self, best: u32) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(BEST_SCORE_KEY, &best.to_string())
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }
}

enum Action {
    Command(Command),
    TouchStart(TouchEvent),
    TouchEnd(TouchEvent),
}

impl From<Command> for Action {
    fn from(c: Command) -> Self {
        Action::Command(c)
    }
}

struct Model {
    game: GameSession<StdRng, LocalStorageStore>,
    container: NodeRef,
    touch_start: Option<(i32, i32)>,
}

impl Component for Model {
    type Message = Action;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            game: GameSession::new(StdRng::from_os_rng(), LocalStorageStore),
            container: NodeRef::default(),
            touch_start: None,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, action: Self::Message) -> bool {
        match action {
            Action::Command(c) => self.game.apply(c),
            Action::TouchStart(ts) => {
                let tl = ts.touches();
                if tl.length() != 1 {
                    return false;
                }
                self.touch_start = tl.get(0).map(|t| (t.client_x(), t.client_y()));
                false
            }
            Action::TouchEnd(te) => {
                let Some(start) = self.touch_start.take() else {
                    return false;
                };
                let Some(t) = te.changed_touches().get(0) else {
                    return false;
                };
                match swipe_direction(start, (t.client_x(), t.client_y())) {
                    Some(d) => self.game.apply(Command::Move(d)),
                    None => false,
                }
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let frame = self.game.frame();

        let rows = frame.grid.iter().map(|r| {
            html! {
                <tr>
                    {for r.iter().map(|&v| html! {
                        <td>
                            <div class={Tile::from_value(v).map(|t| format!("value_{}", t.exponent())).unwrap_or("empty".into())}>
                                {if v != 0 { html! { v } } else { html! {} }}
                            </div>
                        </td>
                    })}
                </tr>
            }
        });

        let onkeydown = link.batch_callback(|e: KeyboardEvent| {
            let command = key_command(&e.key(), e.ctrl_key() || e.meta_key());
            if command.is_some() {
                e.prevent_default();
            }
            command.map(Action::from)
        });

        let ontouchstart = link.callback(Action::TouchStart);
        let ontouchend = link.callback(Action::TouchEnd);

        let overlay = if frame.game_over || frame.show_win {
            html! {
                <div class="overlay">
                    <h2>{ if frame.game_over { "Game over" } else { "2048!" } }</h2>
                    <button onclick={link.callback(|_| Action::from(Command::NewGame))}>{ "New game" }</button>
                    if frame.game_over && frame.can_undo {
                        <button onclick={link.callback(|_| Action::from(Command::Undo))}>{ "Rewind" }</button>
                    }
                    if frame.show_win {
                        <button onclick={link.callback(|_| Action::from(Command::KeepPlaying))}>{ "Keep playing" }</button>
                    }
                </div>
            }
        } else {
            html! {}
        };

        html! {
            <div ref={self.container.clone()} class="container" tabindex="0" {onkeydown} {ontouchstart} {ontouchend}>
                <div class="scores">
                    <div class="score">{ "Score " }{ frame.score.to_formatted_string(&Locale::en) }</div>
                    <div class="best">{ "Best " }{ frame.best_score.to_formatted_string(&Locale::en) }</div>
                </div>
                <table class="game">
                    { for rows }
                </table>
                { overlay }
                <button onclick={link.callback(|_| Action::from(Command::NewGame))}>{ "New game" }</button>
                <button disabled={!frame.can_undo || frame.game_over} onclick={link.callback(|_| Action::from(Command::Undo))}>{ "Undo" }</button>
            </div>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        if let Some(container) = self.container.cast::<HtmlElement>() {
            if let Err(e) = container.focus() {
                log::warn!("could not focus game: {e:?}");
            }
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<Model>::new().render();
}
