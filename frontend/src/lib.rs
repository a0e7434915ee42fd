mod map;
mod storage;

use seed::{prelude::*, virtual_dom::AtValue, *};
use serde::Deserialize;
use shared::{
    AppState, DisplayRegion, PaymentMethod, PendingReply, RouteForm, Speaker, StatusTicket,
    assistant::ASSISTANT_DELAY_MS,
    order::{
        GEO_TIMEOUT_MS, LOCATE_IDLE_LABEL, LOCATING_LABEL, LOCATION_APPLIED, LOCATION_FAILED,
        LOCATION_UNSUPPORTED, OrderForm,
    },
    presentation::DisplayBuffer,
    resolver::format_coordinate_literal,
    session::{LoginForm, SocialProvider},
    status::STATUS_TICK_MS,
    Coordinate,
};
use wasm_bindgen::{prelude::wasm_bindgen, JsCast};

use crate::map::{init_map, locate_user, show_address, LeafletMap};
use crate::storage::BrowserStorage;

pub struct Model {
    app: AppState<BrowserStorage>,
    display: DisplayBuffer,
    map: LeafletMap,
    route_form: RouteForm,
    login_form: LoginForm,
    login_error: Option<String>,
    chat_input: String,
    order_form: OrderForm,
    order_feedback: Option<Feedback>,
    locating: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct Feedback {
    text: String,
    is_error: bool,
}

impl Feedback {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

pub enum Msg {
    PickupChanged(String),
    DropoffChanged(String),
    FallbackChanged(String),
    BaseFareChanged(String),
    RateChanged(String),
    SpeedChanged(String),
    TrafficChanged(String),
    PaymentSelected(PaymentMethod),
    SubmitRoute,
    StatusTick(StatusTicket),
    EmailChanged(String),
    PhoneChanged(String),
    RememberToggled,
    Login,
    LoginWith(SocialProvider),
    Logout,
    ChatInputChanged(String),
    AskAssistant,
    AssistantReplied(PendingReply),
    ProductChanged(String),
    RecipientChanged(String),
    LocationChanged(String),
    LocationCommitted,
    SafetyToggled,
    SubmitOrder,
    UseMyLocation,
    GeoLocated { lat: f64, lon: f64 },
    GeoFailed(GeoFailure),
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoFailure {
    Unsupported,
    Denied,
}

impl GeoFailure {
    fn message(self) -> &'static str {
        match self {
            GeoFailure::Unsupported => LOCATION_UNSUPPORTED,
            GeoFailure::Denied => LOCATION_FAILED,
        }
    }
}

#[derive(Deserialize)]
struct GeoLocatedPayload {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct GeoFailedPayload {
    reason: GeoFailure,
}

fn default_route_form() -> RouteForm {
    RouteForm {
        pickup: "São Paulo".into(),
        dropoff: "Campinas".into(),
        fallback_km: "5".into(),
        base_fare: "8".into(),
        per_km_rate: "2,5".into(),
        avg_speed_kmh: "30".into(),
        traffic_factor: "1".into(),
        payment: PaymentMethod::Pix,
    }
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders.stream(streams::window_event(Ev::from("geo-located"), |event| {
        let payload = event
            .dyn_into::<web_sys::CustomEvent>()
            .ok()
            .and_then(|event| serde_wasm_bindgen::from_value::<GeoLocatedPayload>(event.detail()).ok());
        match payload {
            Some(GeoLocatedPayload { lat, lon }) => Msg::GeoLocated { lat, lon },
            None => Msg::GeoFailed(GeoFailure::Denied),
        }
    }));
    orders.stream(streams::window_event(Ev::from("geo-failed"), |event| {
        let reason = event
            .dyn_into::<web_sys::CustomEvent>()
            .ok()
            .and_then(|event| serde_wasm_bindgen::from_value::<GeoFailedPayload>(event.detail()).ok())
            .map(|payload| payload.reason)
            .unwrap_or(GeoFailure::Denied);
        Msg::GeoFailed(reason)
    }));

    let app = AppState::new(BrowserStorage);
    let mut display = DisplayBuffer::default();
    app.render_badge(&mut display);
    if app.session.validate() {
        web_sys::console::debug_1(&"[frontend] restored session from local storage".into());
    }

    Model {
        app,
        display,
        map: LeafletMap,
        route_form: default_route_form(),
        login_form: LoginForm::default(),
        login_error: None,
        chat_input: String::new(),
        order_form: OrderForm::default(),
        order_feedback: None,
        locating: false,
    }
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::PickupChanged(val) => model.route_form.pickup = val,
        Msg::DropoffChanged(val) => model.route_form.dropoff = val,
        Msg::FallbackChanged(val) => model.route_form.fallback_km = val,
        Msg::BaseFareChanged(val) => model.route_form.base_fare = val,
        Msg::RateChanged(val) => model.route_form.per_km_rate = val,
        Msg::SpeedChanged(val) => model.route_form.avg_speed_kmh = val,
        Msg::TrafficChanged(val) => model.route_form.traffic_factor = val,
        Msg::PaymentSelected(method) => model.route_form.payment = method,
        Msg::SubmitRoute => {
            match model
                .app
                .submit_route(&model.route_form, &mut model.display, &mut model.map)
            {
                Ok(ticket) => {
                    if let Some(result) = &model.app.last_simulation {
                        web_sys::console::debug_1(
                            &format!(
                                "[frontend] simulated {} -> {}: {:.1} km via {:?}",
                                result.start_label,
                                result.end_label,
                                result.distance_km,
                                result.source
                            )
                            .into(),
                        );
                    }
                    schedule_status_tick(orders, ticket);
                }
                Err(err) => {
                    web_sys::console::debug_1(&format!("[frontend] route form rejected: {err}").into());
                }
            }
        }
        Msg::StatusTick(ticket) => {
            if model.app.advance_status(ticket, &mut model.display) {
                schedule_status_tick(orders, ticket);
            }
        }
        Msg::EmailChanged(val) => model.login_form.email = val,
        Msg::PhoneChanged(val) => model.login_form.phone = val,
        Msg::RememberToggled => model.login_form.remember = !model.login_form.remember,
        Msg::Login => login(model, None),
        Msg::LoginWith(provider) => login(model, Some(provider)),
        Msg::Logout => {
            if let Err(err) = model.app.logout(&mut model.display) {
                web_sys::console::error_1(&format!("[frontend] logout: {err}").into());
            }
            model.login_error = None;
        }
        Msg::ChatInputChanged(val) => model.chat_input = val,
        Msg::AskAssistant => {
            if let Some(reply) = model.app.ask(&model.chat_input) {
                model.chat_input.clear();
                orders.perform_cmd(cmds::timeout(ASSISTANT_DELAY_MS, move || {
                    Msg::AssistantReplied(reply)
                }));
            }
        }
        Msg::AssistantReplied(reply) => model.app.deliver(reply),
        Msg::ProductChanged(val) => model.order_form.product = val,
        Msg::RecipientChanged(val) => model.order_form.recipient = val,
        Msg::LocationChanged(val) => model.order_form.location = val,
        Msg::LocationCommitted => {
            let address = model.order_form.location.trim();
            if !address.is_empty() {
                show_address(address);
            }
        }
        Msg::SafetyToggled => {
            model.order_form.safety_confirmed = !model.order_form.safety_confirmed;
        }
        Msg::SubmitOrder => match model.order_form.submit() {
            Ok(confirmation) => {
                show_address(&confirmation.location);
                model.order_feedback = Some(Feedback::ok(confirmation.message()));
                model.order_form = OrderForm::default();
            }
            Err(err) => model.order_feedback = Some(Feedback::error(err.to_string())),
        },
        Msg::UseMyLocation => {
            if model.locating {
                return;
            }
            model.locating = true;
            locate_user(GEO_TIMEOUT_MS);
        }
        Msg::GeoLocated { lat, lon } => {
            model.locating = false;
            let literal = format_coordinate_literal(Coordinate { lat, lon });
            show_address(&literal);
            model.order_form.location = literal;
            model.order_feedback = Some(Feedback::ok(LOCATION_APPLIED));
        }
        Msg::GeoFailed(reason) => {
            model.locating = false;
            web_sys::console::debug_1(&format!("[frontend] geolocation failed: {reason:?}").into());
            model.order_feedback = Some(Feedback::error(reason.message()));
        }
    }
}

fn schedule_status_tick(orders: &mut impl Orders<Msg>, ticket: StatusTicket) {
    orders.perform_cmd(cmds::timeout(STATUS_TICK_MS, move || Msg::StatusTick(ticket)));
}

fn login(model: &mut Model, social: Option<SocialProvider>) {
    let credentials = match model.login_form.to_credentials(social) {
        Ok(credentials) => credentials,
        Err(err) => {
            model.login_error = Some(err.to_string());
            return;
        }
    };
    match model.app.login(credentials, &mut model.display) {
        Ok(()) => {
            model.login_error = None;
            model.login_form = LoginForm::default();
        }
        Err(err) => {
            web_sys::console::error_1(&format!("[frontend] login: {err}").into());
            model.login_error = Some("Não foi possível salvar a sessão neste navegador.".into());
        }
    }
}

pub fn view(model: &Model) -> Node<Msg> {
    div![
        C!["app-container"],
        view_header(model),
        view_hero(model),
        div![
            C!["columns"],
            view_route_form(model),
            div![C!["panels"], view_detail(model), view_summary(model)],
        ],
        div![C!["columns"], view_chat(model), view_order_form(model)],
    ]
}

fn region<'a>(model: &'a Model, region: DisplayRegion) -> &'a str {
    model.display.get(region).unwrap_or("—")
}

fn view_header(model: &Model) -> Node<Msg> {
    header![
        C!["top-bar"],
        h1!["Entrega Rápida"],
        div![
            C!["session"],
            span![C!["badge"], region(model, DisplayRegion::SessionBadge)],
            if model.app.session.validate() {
                button![
                    "Sair",
                    ev(Ev::Click, |event| {
                        event.prevent_default();
                        Msg::Logout
                    }),
                ]
            } else {
                view_login(model)
            }
        ],
    ]
}

fn view_login(model: &Model) -> Node<Msg> {
    form![
        C!["login"],
        ev(Ev::Submit, |event| {
            event.prevent_default();
            Msg::Login
        }),
        input![
            attrs! {
                At::Type => "email",
                At::Placeholder => "E-mail",
                At::Value => &model.login_form.email,
            },
            input_ev(Ev::Input, Msg::EmailChanged),
        ],
        input![
            attrs! {
                At::Type => "tel",
                At::Placeholder => "Telefone",
                At::Value => &model.login_form.phone,
            },
            input_ev(Ev::Input, Msg::PhoneChanged),
        ],
        label![
            input![
                attrs! {
                    At::Type => "checkbox",
                    At::Checked => bool_attr(model.login_form.remember),
                },
                ev(Ev::Change, |_| Msg::RememberToggled),
            ],
            span!["Lembrar de mim"],
        ],
        button!["Entrar", attrs! { At::Type => "submit" }],
        SocialProvider::ALL.iter().map(|&provider| {
            button![
                C!["social"],
                format!("Entrar com {}", provider.label()),
                ev(Ev::Click, move |event| {
                    event.prevent_default();
                    Msg::LoginWith(provider)
                }),
            ]
        }),
        if let Some(error) = &model.login_error {
            p![C!["error"], error]
        } else {
            empty![]
        },
    ]
}

fn view_hero(model: &Model) -> Node<Msg> {
    section![
        C!["hero"],
        div![
            C!["hero-figure"],
            span![C!["label"], "Preço estimado"],
            strong![region(model, DisplayRegion::HeroPrice)],
        ],
        div![
            C!["hero-figure"],
            span![C!["label"], "Chegada em"],
            strong![region(model, DisplayRegion::HeroEta)],
        ],
        div![
            C!["hero-figure", "status"],
            span![C!["label"], "Status"],
            strong![region(model, DisplayRegion::Status)],
        ],
    ]
}

fn view_route_form(model: &Model) -> Node<Msg> {
    let input_field = |label: &str, value: &str, msg: fn(String) -> Msg| {
        div![
            C!["input-field"],
            label![label],
            input![
                attrs! {
                    At::Value => value,
                    At::AutoComplete => "off",
                    At::SpellCheck => "false",
                },
                input_ev(Ev::Input, msg),
            ]
        ]
    };
    let form_data = &model.route_form;

    form![
        C!["controls"],
        ev(Ev::Submit, |event| {
            event.prevent_default();
            Msg::SubmitRoute
        }),
        fieldset![
            legend!["Endereços"],
            input_field("Coleta", &form_data.pickup, Msg::PickupChanged),
            input_field("Entrega", &form_data.dropoff, Msg::DropoffChanged),
            input_field(
                "Distância manual (km)",
                &form_data.fallback_km,
                Msg::FallbackChanged
            ),
            small!["Use um nome de cidade ou \"lat, lng\". Caso contrário, a distância manual é usada."],
        ],
        fieldset![
            legend!["Tarifa"],
            input_field("Tarifa base (R$)", &form_data.base_fare, Msg::BaseFareChanged),
            input_field("Valor por km (R$)", &form_data.per_km_rate, Msg::RateChanged),
            input_field(
                "Velocidade média (km/h)",
                &form_data.avg_speed_kmh,
                Msg::SpeedChanged
            ),
            input_field(
                "Fator de trânsito",
                &form_data.traffic_factor,
                Msg::TrafficChanged
            ),
        ],
        fieldset![
            legend!["Pagamento"],
            PaymentMethod::ALL.iter().map(|&method| {
                label![
                    input![
                        attrs! {
                            At::Type => "radio",
                            At::Name => "payment",
                            At::Checked => bool_attr(form_data.payment == method),
                        },
                        ev(Ev::Change, move |_| Msg::PaymentSelected(method)),
                    ],
                    span![method.label()],
                ]
            }),
        ],
        button!["Simular entrega", attrs! { At::Type => "submit" }],
        match model.display.get(DisplayRegion::FormFeedback) {
            Some(message) if !message.is_empty() => p![C!["error"], message],
            _ => empty![],
        },
    ]
}

fn view_detail(model: &Model) -> Node<Msg> {
    let card = |label: &str, content: &str| {
        div![
            C!["metadata-card"],
            span![C!["label"], label],
            strong![content],
        ]
    };

    section![
        C!["detail"],
        h2!["Detalhes"],
        div![
            C!["metadata-grid"],
            card("Distância", region(model, DisplayRegion::DetailDistance)),
            card("Preço", region(model, DisplayRegion::DetailPrice)),
            card("Tempo", region(model, DisplayRegion::DetailEta)),
        ],
        div![C!["map"], attrs! { At::Id => "route-map" }],
    ]
}

fn view_summary(model: &Model) -> Node<Msg> {
    if model.app.last_simulation.is_none() {
        return section![
            C!["summary"],
            h2!["Resumo"],
            p!["Simule uma entrega para ver o resumo."]
        ];
    }
    section![
        C!["summary"],
        h2!["Resumo"],
        p![region(model, DisplayRegion::SummaryRoute)],
        p![region(model, DisplayRegion::SummaryTotal)],
        p![format!(
            "Pagamento: {}",
            region(model, DisplayRegion::SummaryPayment)
        )],
    ]
}

fn view_chat(model: &Model) -> Node<Msg> {
    section![
        C!["chat"],
        h2!["Assistente"],
        ul![
            C!["transcript"],
            model.app.transcript.iter().map(|message| {
                li![
                    C![match message.speaker {
                        Speaker::User => "from-user",
                        Speaker::Assistant => "from-assistant",
                    }],
                    &message.text
                ]
            })
        ],
        form![
            ev(Ev::Submit, |event| {
                event.prevent_default();
                Msg::AskAssistant
            }),
            input![
                attrs! {
                    At::Value => &model.chat_input,
                    At::Placeholder => "Pergunte sobre preço, prazo, rota ou pagamento",
                },
                input_ev(Ev::Input, Msg::ChatInputChanged),
            ],
            button!["Enviar", attrs! { At::Type => "submit" }],
        ],
    ]
}

fn view_order_form(model: &Model) -> Node<Msg> {
    let order = &model.order_form;
    form![
        C!["order"],
        ev(Ev::Submit, |event| {
            event.prevent_default();
            Msg::SubmitOrder
        }),
        h2!["Pedido rápido"],
        input![
            attrs! { At::Placeholder => "Produto", At::Value => &order.product },
            input_ev(Ev::Input, Msg::ProductChanged),
        ],
        input![
            attrs! { At::Placeholder => "Recebedor", At::Value => &order.recipient },
            input_ev(Ev::Input, Msg::RecipientChanged),
        ],
        input![
            attrs! { At::Placeholder => "Localização", At::Value => &order.location },
            input_ev(Ev::Input, Msg::LocationChanged),
            ev(Ev::Change, |_| Msg::LocationCommitted),
            ev(Ev::Blur, |_| Msg::LocationCommitted),
        ],
        button![
            if model.locating {
                LOCATING_LABEL
            } else {
                LOCATE_IDLE_LABEL
            },
            attrs! { At::Disabled => bool_attr(model.locating) },
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::UseMyLocation
            }),
        ],
        label![
            input![
                attrs! {
                    At::Type => "checkbox",
                    At::Checked => bool_attr(order.safety_confirmed),
                },
                ev(Ev::Change, |_| Msg::SafetyToggled),
            ],
            span!["Confirmo as diretrizes de segurança"],
        ],
        button!["Registrar pedido", attrs! { At::Type => "submit" }],
        match &model.order_feedback {
            Some(feedback) => p![
                C![if feedback.is_error { "error" } else { "success" }],
                &feedback.text
            ],
            None => empty![],
        },
        iframe![C!["address-map"], attrs! { At::Id => "map-frame" }],
    ]
}

#[wasm_bindgen(start)]
pub fn start() {
    init_map();
    App::start("app", init, update, view);
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}
