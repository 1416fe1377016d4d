use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlFormElement, HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::api::HttpApi;
use crate::board::{ActivityBoard, BoardEvent, BoardView, Message};
use crate::config::BoardConfig;
use crate::model::Catalog;
use crate::render::{self, DATA_ACTIVITY, DATA_EMAIL, DELETE_BUTTON_CLASS};

const LOADING: &str = "<p>Loading activities...</p>";

/// Everything on screen. Rebuilt wholesale from each catalog fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardState {
    list_markup: AttrValue,
    options: Vec<(String, String)>,
    message: Option<Message>,
    message_seq: u64,
    message_visible: bool,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            list_markup: AttrValue::Static(LOADING),
            options: render::select_options(&Catalog::default()),
            message: None,
            message_seq: 0,
            message_visible: false,
        }
    }
}

pub enum BoardAction {
    Loaded(Catalog),
    LoadFailed,
    /// Show a message under the given sequence number.
    ShowMessage(u64, Message),
    /// Hide the message, unless a newer one has replaced it.
    HideMessage(u64),
}

impl Reducible for BoardState {
    type Action = BoardAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            BoardAction::Loaded(catalog) => {
                next.list_markup = AttrValue::from(render::catalog_markup(&catalog));
                next.options = render::select_options(&catalog);
            }
            BoardAction::LoadFailed => {
                next.list_markup = AttrValue::from(render::load_failure_markup());
            }
            BoardAction::ShowMessage(seq, message) => {
                next.message = Some(message);
                next.message_seq = seq;
                next.message_visible = true;
            }
            BoardAction::HideMessage(seq) => {
                if seq != self.message_seq {
                    return self;
                }
                next.message_visible = false;
            }
        }
        Rc::new(next)
    }
}

/// `BoardView` backed by the component's reducer.
#[derive(Clone)]
struct ReducerView {
    dispatcher: UseReducerDispatcher<BoardState>,
    last_seq: Rc<RefCell<u64>>,
    form: NodeRef,
}

impl BoardView for ReducerView {
    fn render_catalog(&self, catalog: &Catalog) {
        self.dispatcher.dispatch(BoardAction::Loaded(catalog.clone()));
    }

    fn render_load_failure(&self) {
        self.dispatcher.dispatch(BoardAction::LoadFailed);
    }

    fn show_message(&self, message: Message) {
        let seq = {
            let mut last = self.last_seq.borrow_mut();
            *last += 1;
            *last
        };
        let delay = message.hide_after_ms;
        self.dispatcher.dispatch(BoardAction::ShowMessage(seq, message));

        let dispatcher = self.dispatcher.clone();
        let _ = Timeout::new(delay, move || dispatcher.dispatch(BoardAction::HideMessage(seq))).forget();
    }

    fn reset_signup_form(&self) {
        if let Some(form) = self.form.cast::<HtmlFormElement>() {
            form.reset();
        }
    }

    fn confirm(&self, prompt: &str) -> bool {
        gloo::dialogs::confirm(prompt)
    }
}

/// Turns the data attributes of a clicked delete control into an event.
fn unregister_event(activity: Option<String>, email: Option<String>) -> Option<BoardEvent> {
    match (activity, email) {
        (Some(activity), Some(email)) if !activity.is_empty() && !email.is_empty() => {
            Some(BoardEvent::Unregister { activity, email })
        }
        _ => None,
    }
}

/// Signup from the live field values; `None` until the form is mounted.
fn signup_event(email: Option<String>, activity: Option<String>) -> Option<BoardEvent> {
    Some(BoardEvent::Signup { email: email?, activity: activity? })
}

fn make_board<V: BoardView>(config: &BoardConfig, view: V) -> ActivityBoard<HttpApi, V> {
    ActivityBoard::new(HttpApi::new(config.api_base.clone()), view, config.clone())
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: BoardConfig,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let state = use_reducer(BoardState::default);
    let last_seq = use_mut_ref(|| 0u64);
    let form_ref = use_node_ref();
    let email_ref = use_node_ref();
    let activity_ref = use_node_ref();

    // Rebuilt only when the config changes.
    let board = {
        let view = ReducerView {
            dispatcher: state.dispatcher(),
            last_seq,
            form: form_ref.clone(),
        };
        use_memo(props.config.clone(), move |config| make_board(config, view))
    };

    let emit = Callback::from(move |event: BoardEvent| {
        let board = board.clone();
        spawn_local(async move { board.handle(event).await });
    });

    // Initial load
    {
        let emit = emit.clone();
        use_effect_with((), move |_| {
            emit.emit(BoardEvent::Load);
            || ()
        });
    }

    let on_list_click = {
        let emit = emit.clone();
        Callback::from(move |e: MouseEvent| {
            let Some(target) = e.target_dyn_into::<Element>() else {
                return;
            };
            let Ok(Some(button)) = target.closest(&format!(".{DELETE_BUTTON_CLASS}")) else {
                return;
            };
            e.stop_propagation();
            let event = unregister_event(
                button.get_attribute(DATA_ACTIVITY),
                button.get_attribute(DATA_EMAIL),
            );
            match event {
                Some(event) => emit.emit(event),
                None => log::warn!("delete control without a target"),
            }
        })
    };

    let on_submit = {
        let emit = emit.clone();
        let email_ref = email_ref.clone();
        let activity_ref = activity_ref.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let email = email_ref.cast::<HtmlInputElement>().map(|i| i.value());
            let activity = activity_ref.cast::<HtmlSelectElement>().map(|s| s.value());
            match signup_event(email, activity) {
                Some(event) => emit.emit(event),
                None => log::warn!("signup form is not mounted"),
            }
        })
    };

    let message_class = classes!(
        state.message.as_ref().map(|m| m.kind.class()),
        (!state.message_visible).then_some("hidden")
    );
    let message_text = state.message.as_ref().map(|m| m.text.clone()).unwrap_or_default();

    html! {
      <main>
        <section id="activities-container">
          <h3>{ "Available Activities" }</h3>
          <div id="activities-list" onclick={on_list_click}>
            { Html::from_html_unchecked(state.list_markup.clone()) }
          </div>
        </section>

        <section id="signup-container">
          <h3>{ "Sign Up for an Activity" }</h3>
          <form id="signup-form" ref={form_ref} onsubmit={on_submit}>
            <div class="form-group">
              <label for="email">{ "Student Email:" }</label>
              <input
                type="email"
                id="email"
                name="email"
                required=true
                placeholder="your-email@school.edu"
                ref={email_ref}
              />
            </div>
            <div class="form-group">
              <label for="activity">{ "Select Activity:" }</label>
              <select id="activity" name="activity" required=true ref={activity_ref}>
                { for state.options.iter().map(|(value, label)| html! {
                    <option value={value.clone()}>{ label.clone() }</option>
                }) }
              </select>
            </div>
            <button type="submit">{ "Sign Up" }</button>
          </form>
          <div id="message" class={message_class}>{ message_text }</div>
        </section>
      </main>
    }
}
