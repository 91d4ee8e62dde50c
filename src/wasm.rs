#![cfg(target_arch = "wasm32")]

use std::time::Duration;

use leptos::*;
use rand::SeedableRng;
use wasm_bindgen::prelude::wasm_bindgen;

use crate::{
    AchievementLog, AchievementTracker, Answer, BINARY_MOLECULES, GameConfig, GameKind, GameSession, KeyValueStore, LevelData, LevelId,
    Phase, ProgressStore, Question, ReactantSlot, Screen, SessionError, Step, StoreError,
    build_level, builtin_catalog, builtin_compounds,
};

const GAME: GameKind = GameKind::LimitingReactant;

/// Browser local storage as a [`KeyValueStore`].
struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        leptos::window().local_storage().ok().flatten()
    }
}

impl KeyValueStore for LocalStorage {
    fn get_raw(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set_raw(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let storage = Self::storage().ok_or_else(|| StoreError::Backend {
            key: key.to_string(),
            message: "local storage is unavailable".to_string(),
        })?;

        storage
            .set_item(key, &value)
            .map_err(|error| StoreError::Backend {
                key: key.to_string(),
                message: format!("{:?}", error),
            })
    }
}

type Session = GameSession<LocalStorage, AchievementLog>;

/// Runs `action` against the session and asks the views to redraw.
fn act(
    session: StoredValue<Session>,
    revision: RwSignal<u32>,
    action: impl FnOnce(&mut Session) -> Result<(), SessionError>,
) {
    session.update_value(|session| {
        if let Err(error) = action(session) {
            log::warn!("{}", error);
        }
    });
    revision.update(|value| *value += 1);
}

#[derive(Clone, PartialEq)]
struct QuestionView {
    question: Question,
    position: usize,
    total: usize,
    feedback: Option<(bool, String)>,
}

fn question_view(session: &Session) -> Option<QuestionView> {
    session.run().map(|run| QuestionView {
        question: run.current_question().clone(),
        position: run.position(),
        total: run.len(),
        feedback: match run.phase() {
            Phase::FeedbackShown(grade) => Some((grade.correct, grade.expected.clone())),
            _ => None,
        },
    })
}

fn selected_slot(session: &Session) -> Option<ReactantSlot> {
    match session.run().map(|run| run.phase()) {
        Some(Phase::AnswerSelected(Answer::Limiting { reactant, .. })) => Some(*reactant),
        _ => None,
    }
}

#[component]
fn Menu(session: StoredValue<Session>, on_start: Callback<LevelId>) -> impl IntoView {
    let progress = session.with_value(|session| session.progress().clone());

    view! {
        <section class="panel menu-panel">
            <h1>"Limiting reactant"</h1>
            <p class="eyebrow">{format!("Total points: {}", progress.total_points)}</p>
            <div class="level-grid">
                {LevelId::ALL
                    .into_iter()
                    .map(|level| {
                        let stats = progress.level(level);
                        let status = if stats.mastered {
                            "Mastered".to_string()
                        } else {
                            format!("Best: {} correct", stats.best_correct)
                        };

                        view! {
                            <button
                                class="btn level-button"
                                disabled=!progress.is_unlocked(level)
                                on:click=move |_| on_start.call(level)
                            >
                                <span>{format!("Level {}", level.number())}</span>
                                <span class="level-meta">{status}</span>
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

#[component]
fn LevelScreen(session: StoredValue<Session>, revision: RwSignal<u32>) -> impl IntoView {
    let (product_input, set_product_input) = create_signal(String::new());
    let (text_input, set_text_input) = create_signal(String::new());
    let (hint, set_hint) = create_signal(None::<String>);

    let current = create_memo(move |_| {
        revision.get();
        session.with_value(question_view)
    });

    let remaining = move || {
        revision.get();
        session.with_value(|session| {
            session
                .run()
                .and_then(|run| run.countdown())
                .map(|countdown| countdown.remaining())
        })
    };

    let choose = move |slot: ReactantSlot| {
        let product_amount = product_input.get_untracked().trim().parse::<u64>().ok();
        act(session, revision, |session| {
            session.select(Answer::Limiting {
                reactant: slot,
                product_amount,
            })
        });
    };

    let submit = move |_| {
        let text = text_input.get_untracked();
        act(session, revision, |session| {
            if let Some(Question::Explanation { .. }) =
                session.run().map(|run| run.current_question())
            {
                session.select(Answer::Text { text })?;
            }
            session.submit().map(|_| ())
        });
    };

    let show_hint = move |_| {
        let mut revealed = None;
        session.update_value(|session| revealed = session.use_hint().ok().flatten());
        set_hint.set(revealed);
    };

    let advance = move |_| {
        set_product_input.set(String::new());
        set_text_input.set(String::new());
        set_hint.set(None);
        act(session, revision, |session| match session.next()? {
            Step::NextQuestion(_) => Ok(()),
            Step::LevelComplete => session.finish_level().map(|_| ()),
        });
    };

    let slot_class = move |slot: ReactantSlot| {
        move || {
            revision.get();
            if session.with_value(selected_slot) == Some(slot) {
                "btn reactant-option selected"
            } else {
                "btn reactant-option"
            }
        }
    };

    view! {
        <section class="panel play-panel">
            <div class="timer">
                {move || remaining().map(|seconds| format!("⏱ {} s", seconds))}
            </div>
            {move || {
                current
                    .get()
                    .map(|view| {
                        let controls = match &view.question {
                            Question::LimitingReactant { reaction, .. } => {
                                let first = reaction.reactants[0].clone();
                                let second = reaction.reactants[1].clone();
                                let product = reaction
                                    .products
                                    .first()
                                    .map(|product| product.formula.clone())
                                    .unwrap_or_default();
                                view! {
                                    <div class="options-grid">
                                        <button
                                            class=slot_class(ReactantSlot::First)
                                            style=first.color.map(|color| format!("border-color: {}", color))
                                            on:click=move |_| choose(ReactantSlot::First)
                                        >
                                            {first.formula}
                                        </button>
                                        <button
                                            class=slot_class(ReactantSlot::Second)
                                            style=second.color.map(|color| format!("border-color: {}", color))
                                            on:click=move |_| choose(ReactantSlot::Second)
                                        >
                                            {second.formula}
                                        </button>
                                    </div>
                                    <label class="amount-field">
                                        {format!("{} formed (optional)", product)}
                                        <input
                                            type="number"
                                            min="0"
                                            prop:value=move || product_input.get()
                                            on:input=move |ev| set_product_input.set(event_target_value(&ev))
                                        />
                                    </label>
                                }
                                .into_view()
                            }
                            Question::LimitingMass { reaction, .. } => {
                                let first = reaction.reactants[0].clone();
                                let second = reaction.reactants[1].clone();
                                view! {
                                    <div class="options-grid">
                                        <button
                                            class=slot_class(ReactantSlot::First)
                                            style=first.color.map(|color| format!("border-color: {}", color))
                                            on:click=move |_| choose(ReactantSlot::First)
                                        >
                                            {first.formula}
                                        </button>
                                        <button
                                            class=slot_class(ReactantSlot::Second)
                                            style=second.color.map(|color| format!("border-color: {}", color))
                                            on:click=move |_| choose(ReactantSlot::Second)
                                        >
                                            {second.formula}
                                        </button>
                                    </div>
                                }
                                .into_view()
                            }
                            Question::Explanation { .. } => view! {
                                <textarea
                                    class="explanation-input"
                                    prop:value=move || text_input.get()
                                    on:input=move |ev| set_text_input.set(event_target_value(&ev))
                                ></textarea>
                            }
                            .into_view(),
                            _ => view! { <p class="error-body">"Unsupported question type"</p> }
                                .into_view(),
                        };

                        let feedback = view.feedback.clone().map(|(correct, expected)| {
                            view! {
                                <div class=if correct { "result-title correct" } else { "result-title incorrect" }>
                                    {if correct { "Correct" } else { "Incorrect" }}
                                </div>
                                <p class="result-subtitle">{expected}</p>
                                <button class="btn btn-primary" type="button" on:click=advance>
                                    "Next"
                                </button>
                            }
                        });
                        let answering = view.feedback.is_none();

                        view! {
                            <div class="prompt-area">
                                <p class="eyebrow">
                                    {format!("Question {}/{}", view.position + 1, view.total)}
                                </p>
                                <p class="prompt">{view.question.prompt()}</p>
                            </div>
                            {controls}
                            <Show when=move || answering>
                                <div class="overlay-actions">
                                    <button class="btn" type="button" on:click=show_hint>"Hint"</button>
                                    <button class="btn btn-primary" type="button" on:click=submit>
                                        "Check"
                                    </button>
                                </div>
                            </Show>
                            {move || hint.get().map(|text| view! { <p class="hint">{text}</p> })}
                            {feedback}
                        }
                        .into_view()
                    })
            }}
        </section>
    }
}

#[component]
fn Summary(
    session: StoredValue<Session>,
    on_start: Callback<LevelId>,
    on_menu: Callback<()>,
) -> impl IntoView {
    let outcome = session.with_value(|session| session.last_outcome().copied());

    outcome.map(|outcome| {
        let retry = outcome.level;
        let next = outcome.level.next().filter(|_| outcome.mastered);

        view! {
            <section class="panel summary-panel">
                <h2>{format!("Level {} complete", outcome.level.number())}</h2>
                <p>{format!("{}/{} correct, {} points", outcome.correct, outcome.total, outcome.points)}</p>
                {outcome
                    .explanation_average
                    .map(|average| view! { <p>{format!("Explanation score: {:.0}%", average * 100.0)}</p> })}
                <p class=if outcome.mastered { "correct" } else { "incorrect" }>
                    {if outcome.mastered { "Mastered!" } else { "Not mastered yet" }}
                </p>
                <div class="overlay-actions">
                    {next.map(|level| view! {
                        <button class="btn btn-primary" type="button" on:click=move |_| on_start.call(level)>
                            "Next level"
                        </button>
                    })}
                    <button class="btn" type="button" on:click=move |_| on_start.call(retry)>"Retry"</button>
                    <button class="btn" type="button" on:click=move |_| on_menu.call(())>"Back to menu"</button>
                </div>
            </section>
        }
    })
}

#[component]
fn App() -> impl IntoView {
    let session = store_value(Session::new(
        GAME,
        GameConfig::for_game(GAME),
        ProgressStore::new(LocalStorage),
        AchievementLog::new(),
    ));
    let catalog = store_value(builtin_catalog());
    let compounds = store_value(builtin_compounds());
    let revision = create_rw_signal(0u32);
    let (error, set_error) = create_signal(None::<String>);

    let screen = create_memo(move |_| {
        revision.get();
        session.with_value(|session| session.screen())
    });

    let on_start = Callback::new(move |level: LevelId| {
        let mut rng = rand::rngs::StdRng::from_entropy();
        let built = catalog.with_value(|catalog| {
            compounds.with_value(|compounds| {
                let data = LevelData {
                    catalog,
                    compounds,
                    molecules: BINARY_MOLECULES,
                };
                session.with_value(|session| {
                    build_level(&mut rng, GAME, level, session.config(), &data)
                })
            })
        });

        match built {
            Ok(questions) => {
                set_error.set(None);
                act(session, revision, |session| session.start_level(level, questions));
            }
            Err(build_error) => set_error.set(Some(build_error.to_string())),
        }
    });

    let on_menu = Callback::new(move |_: ()| {
        act(session, revision, |session| session.return_to_menu());
    });

    if let Ok(handle) = set_interval_with_handle(
        move || {
            let mut ticked = false;
            session.update_value(|session| ticked = session.tick().is_ok());
            if ticked {
                revision.update(|value| *value += 1);
            }
        },
        Duration::from_secs(1),
    ) {
        on_cleanup(move || handle.clear());
    }

    let notification = move || {
        revision.get();
        session.with_value(|session| {
            session
                .achievements()
                .current_notification()
                .map(|achievement| achievement.title())
        })
    };

    view! {
        <div class="app-shell">
            {move || match screen.get() {
                Screen::Menu => view! { <Menu session=session on_start=on_start /> }.into_view(),
                Screen::Level(_) => view! { <LevelScreen session=session revision=revision /> }.into_view(),
                Screen::Summary(_) => {
                    view! { <Summary session=session on_start=on_start on_menu=on_menu /> }.into_view()
                }
            }}
            {move || error.get().map(|message| view! { <p class="error-body">{message}</p> })}
            {move || {
                notification()
                    .map(|title| {
                        view! {
                            <div class="toast" role="status">
                                <span>{title}</span>
                                <button
                                    class="btn"
                                    type="button"
                                    on:click=move |_| {
                                        act(session, revision, |session| {
                                            session.achievements_mut().dismiss_notification();
                                            Ok(())
                                        })
                                    }
                                >
                                    "OK"
                                </button>
                            </div>
                        }
                    })
            }}
        </div>
    }
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("chemgames: initialized");
    mount_to_body(|| view! { <App /> });
}
