// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Panel, Record, RecordCode, RecordKind, ResultsPayload, ViewState, format_currency};

pub const CREDIT_CARD_LABEL: &str = "Tarjeta de Crédito";
pub const OTHER_KIND_LABEL: &str = "Otro";
pub const LIMIT_LABEL: &str = "Límite de Crédito";
pub const KIND_HEADING: &str = "Tipo";
pub const ACTIVE_BADGE: &str = "Activa";

const INITIAL_HEADING: &str = "Buscador de Tarjetas";
const INITIAL_PROMPT: &str = "Ingresa un nombre o código y presiona Enter para buscar.";
const NO_RESULTS_HEADING: &str = "Sin resultados";
const NO_RESULTS_TEXT: &str = "No se encontraron resultados";
const PLACEHOLDER_LINES: [&str; 2] = [
    "En la siguiente entrega, aquí se mostrarán los datos obtenidos de la API real.",
    "Por ahora, esto demuestra la manipulación de la interfaz y la interactividad básica.",
];

/// Display form of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFragment {
    pub code: RecordCode,
    pub name: String,
    pub limit: String,
    pub kind_label: &'static str,
}

pub fn kind_label(kind: &RecordKind) -> &'static str {
    match kind {
        RecordKind::CreditCard => CREDIT_CARD_LABEL,
        RecordKind::Other(_) => OTHER_KIND_LABEL,
    }
}

pub fn card_fragment(record: &Record) -> CardFragment {
    CardFragment {
        code: record.code,
        name: record.name.clone(),
        limit: format_currency(record.limit),
        kind_label: kind_label(&record.kind),
    }
}

pub fn results_title(count: usize) -> String {
    format!("Resultados ({count})")
}

pub fn loading_text(query: &str) -> String {
    format!("Buscando información de \"{query}\"...")
}

pub const fn submit_label(busy: bool) -> &'static str {
    if busy { "Buscando..." } else { "Buscar" }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameBody {
    Prompt(&'static str),
    Loading(String),
    Placeholder(&'static [&'static str]),
    Cards(Vec<CardFragment>),
    NoResults(&'static str),
    Error(String),
}

/// Everything a front end needs to draw the visible panel. Built fresh from
/// the view state on every draw, so nothing from an earlier search survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFrame {
    pub panel: Panel,
    pub heading: String,
    pub body: FrameBody,
}

pub fn view_frame(view: &ViewState) -> ViewFrame {
    let (heading, body) = match view {
        ViewState::Initial => (
            INITIAL_HEADING.to_owned(),
            FrameBody::Prompt(INITIAL_PROMPT),
        ),
        ViewState::Loading { query } => (
            "Buscando...".to_owned(),
            FrameBody::Loading(loading_text(query.as_str())),
        ),
        ViewState::Results(ResultsPayload::Placeholder { query }) => (
            format!("Resultados para: \"{query}\""),
            FrameBody::Placeholder(&PLACEHOLDER_LINES),
        ),
        ViewState::Results(ResultsPayload::Records(records)) => (
            results_title(records.len()),
            FrameBody::Cards(records.iter().map(card_fragment).collect()),
        ),
        ViewState::Empty => (
            NO_RESULTS_HEADING.to_owned(),
            FrameBody::NoResults(NO_RESULTS_TEXT),
        ),
        ViewState::Error { message } => ("Error".to_owned(), FrameBody::Error(message.clone())),
    };
    ViewFrame {
        panel: view.panel(),
        heading,
        body,
    }
}

/// Plain-text lines of the frame body, used by the terminal front end and the
/// one-shot output.
pub fn frame_lines(frame: &ViewFrame) -> Vec<String> {
    match &frame.body {
        FrameBody::Prompt(text) | FrameBody::NoResults(text) => vec![(*text).to_owned()],
        FrameBody::Loading(text) | FrameBody::Error(text) => vec![text.clone()],
        FrameBody::Placeholder(lines) => lines.iter().map(|line| (*line).to_owned()).collect(),
        FrameBody::Cards(cards) => {
            let mut lines = Vec::with_capacity(cards.len() * 5);
            for (index, card) in cards.iter().enumerate() {
                if index > 0 {
                    lines.push(String::new());
                }
                lines.extend(card_lines(card));
            }
            lines
        }
    }
}

pub fn card_lines(card: &CardFragment) -> Vec<String> {
    vec![
        format!("#{}  {}", card.code, card.name),
        format!("  {LIMIT_LABEL}: {}", card.limit),
        format!("  {KIND_HEADING}: {}", card.kind_label),
        format!("  [{ACTIVE_BADGE}]"),
    ]
}

pub fn render_text(frame: &ViewFrame) -> String {
    let mut out = frame.heading.clone();
    out.push('\n');
    for line in frame_lines(frame) {
        out.push('\n');
        out.push_str(&line);
    }
    out.push('\n');
    out
}

pub fn render_html(frame: &ViewFrame) -> String {
    let heading = escape_html(&frame.heading);
    let panel = frame.panel.as_str();
    let inner = match &frame.body {
        FrameBody::Cards(cards) => {
            let mut out = String::from("<div class=\"results-container\">\n");
            for card in cards {
                out.push_str(&card_html(card));
            }
            out.push_str("</div>\n");
            out
        }
        FrameBody::Placeholder(lines) => lines
            .iter()
            .map(|line| format!("<p>{}</p>\n", escape_html(line)))
            .collect(),
        FrameBody::Prompt(text) | FrameBody::NoResults(text) => {
            format!("<p>{}</p>\n", escape_html(text))
        }
        FrameBody::Loading(text) => format!("<p class=\"loading-text\">{}</p>\n", escape_html(text)),
        FrameBody::Error(text) => format!("<p class=\"error-text\">{}</p>\n", escape_html(text)),
    };
    format!("<section class=\"panel panel-{panel}\">\n<h2>{heading}</h2>\n{inner}</section>\n")
}

fn card_html(card: &CardFragment) -> String {
    format!(
        concat!(
            "<div class=\"card\">\n",
            "  <div class=\"card-header\"><span class=\"card-code\">#{code}</span></div>\n",
            "  <div class=\"card-body\">\n",
            "    <h3 class=\"card-title\">{name}</h3>\n",
            "    <p class=\"card-limit-label\">{limit_label}</p>\n",
            "    <p class=\"card-limit-value\">{limit}</p>\n",
            "    <div class=\"card-footer\">\n",
            "      <p class=\"card-type-label\">{kind_heading}</p>\n",
            "      <p class=\"card-type-value\">{kind}</p>\n",
            "      <div class=\"card-badge\">{badge}</div>\n",
            "    </div>\n",
            "  </div>\n",
            "</div>\n",
        ),
        code = card.code,
        name = escape_html(&card.name),
        limit_label = LIMIT_LABEL,
        limit = escape_html(&card.limit),
        kind_heading = KIND_HEADING,
        kind = card.kind_label,
        badge = ACTIVE_BADGE,
    )
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{
        CREDIT_CARD_LABEL, FrameBody, OTHER_KIND_LABEL, card_fragment, frame_lines, render_html,
        render_text, submit_label, view_frame,
    };
    use crate::{
        Panel, Query, QueryPolicy, Record, RecordKind, ResultsPayload, SearchCommand,
        SearchMode, SearchOutcome, SearchState, ViewState, filter_records,
    };

    fn records(view: Vec<Record>) -> ViewState {
        ViewState::Results(ResultsPayload::Records(view))
    }

    #[test]
    fn visa_gold_renders_one_credit_card() {
        let catalog = vec![
            Record::new(1234, "Visa Gold", 500.5, RecordKind::CreditCard),
            Record::new(88, "Cuenta Nómina", 10.0, RecordKind::Other("N".to_owned())),
        ];
        let query = Query::parse("visa", QueryPolicy::LENIENT).expect("valid query");
        let frame = view_frame(&records(filter_records(catalog, &query)));

        assert_eq!(frame.heading, "Resultados (1)");
        let FrameBody::Cards(cards) = &frame.body else {
            panic!("expected cards, got {:?}", frame.body);
        };
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].limit, "$500.50");
        assert_eq!(cards[0].kind_label, CREDIT_CARD_LABEL);
        assert_eq!(cards[0].code.get(), 1234);
        assert_eq!(cards[0].name, "Visa Gold");
    }

    #[test]
    fn any_other_type_code_is_other() {
        for code in ["A", "t", "", "TT"] {
            let card = card_fragment(&Record::new(
                1,
                "x",
                1.0,
                RecordKind::parse(code),
            ));
            assert_eq!(card.kind_label, OTHER_KIND_LABEL, "code {code:?}");
        }
    }

    #[test]
    fn cards_follow_input_order() {
        let frame = view_frame(&records(vec![
            Record::new(3, "Zeta", 1.0, RecordKind::CreditCard),
            Record::new(1, "Alfa", 1.0, RecordKind::CreditCard),
        ]));
        let lines = frame_lines(&frame);
        assert_eq!(lines[0], "#3  Zeta");
        assert!(lines.contains(&"#1  Alfa".to_owned()));
    }

    #[test]
    fn second_search_replaces_earlier_cards() {
        let mut state = SearchState::new(SearchMode::Networked);
        for (generation, name) in [(1, "Visa Gold"), (2, "Mastercard")] {
            state.input = name.to_owned();
            state.dispatch(SearchCommand::Submit);
            state.dispatch(SearchCommand::Complete {
                generation,
                outcome: SearchOutcome::Matches(vec![Record::new(
                    generation as i64,
                    name,
                    1.0,
                    RecordKind::CreditCard,
                )]),
            });
        }
        let text = render_text(&view_frame(&state.view));
        assert!(text.contains("Mastercard"));
        assert!(!text.contains("Visa Gold"));
        assert!(text.starts_with("Resultados (1)"));
    }

    #[test]
    fn placeholder_heading_echoes_query() {
        let query = Query::parse("bank", QueryPolicy::STRICT).expect("valid query");
        let frame = view_frame(&ViewState::Results(ResultsPayload::Placeholder { query }));
        assert_eq!(frame.panel, Panel::Results);
        assert_eq!(frame.heading, "Resultados para: \"bank\"");
    }

    #[test]
    fn loading_frame_names_query() {
        let query = Query::parse("bank", QueryPolicy::STRICT).expect("valid query");
        let frame = view_frame(&ViewState::Loading { query });
        assert_eq!(
            frame.body,
            FrameBody::Loading("Buscando información de \"bank\"...".to_owned())
        );
    }

    #[test]
    fn html_escapes_names_and_keeps_structure() {
        let frame = view_frame(&records(vec![Record::new(
            7,
            "<b>Visa</b> & Co",
            1_500.0,
            RecordKind::CreditCard,
        )]));
        let html = render_html(&frame);
        assert!(html.contains("panel-results"));
        assert!(html.contains("&lt;b&gt;Visa&lt;/b&gt; &amp; Co"));
        assert!(html.contains("<span class=\"card-code\">#7</span>"));
        assert!(html.contains("$1,500.00"));
        assert_eq!(html.matches("class=\"card\"").count(), 1);
    }

    #[test]
    fn empty_frame_says_nothing_was_found() {
        let frame = view_frame(&ViewState::Empty);
        assert_eq!(frame.panel, Panel::Empty);
        assert_eq!(frame.body, FrameBody::NoResults("No se encontraron resultados"));
        assert!(render_html(&frame).contains("<p>No se encontraron resultados</p>"));
    }

    #[test]
    fn error_frame_carries_message() {
        let frame = view_frame(&ViewState::Error {
            message: "Error del servidor: Error HTTP: 500 - Internal Server Error".to_owned(),
        });
        assert_eq!(frame.panel, Panel::Error);
        assert!(render_text(&frame).contains("500"));
    }

    #[test]
    fn submit_label_reflects_busy_flag() {
        assert_eq!(submit_label(true), "Buscando...");
        assert_eq!(submit_label(false), "Buscar");
    }
}
