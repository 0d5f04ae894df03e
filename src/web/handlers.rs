// ============================================================================
// Handlers HTTP
// ============================================================================
// Une fonction par route. Les handlers ne font que :
// 1. lire et valider les paramètres
// 2. appeler AppState / compare
// 3. transformer le résultat en réponse (JSON ou HTML)
//
// Toute erreur devient une réponse bien formée : `{ "error": ... }` avec le
// statut de MarketError::status_code() pour le JSON, le formulaire avec un
// message pour le HTML.
// ============================================================================

use actix_web::http::StatusCode;
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tera::Context;
use tracing::{error, info, warn};
use url::form_urlencoded;

use crate::app::AppState;
use crate::compare::{self, compare_manual_batch};
use crate::error::MarketError;
use crate::models::{DashboardEntry, ManualComparisonRow, Quote, Symbol};
use crate::web::format;
use crate::web::templates::{Templates, COMPARISON_FORM, INDEX};

const DEFAULT_CHART_SYMBOL: &str = "AAPL";
const DEFAULT_CHART_RANGE: &str = "1y";
const DEFAULT_CHART_INTERVAL: &str = "1d";
const DEFAULT_INVESTMENT: &str = "10000";
const DEFAULT_YEARS: &str = "10";

// ============================================================================
// Réponses communes
// ============================================================================

/// `{ "error": "..." }` avec le statut associé à l'erreur
fn error_json(err: &MarketError) -> HttpResponse {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(json!({ "error": err.to_string() }))
}

fn render_html(templates: &Templates, name: &str, context: &Context, status: StatusCode) -> HttpResponse {
    match templates.render(name, context) {
        Ok(body) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            error!(template = name, error = ?e, "Template rendering failed");
            HttpResponse::InternalServerError().body("Template rendering failed")
        }
    }
}

// ============================================================================
// Dashboard
// ============================================================================

/// Carte d'un symbole sur la page d'accueil, valeurs déjà formatées
#[derive(Debug, Serialize)]
struct QuoteCard {
    symbol: String,
    open: String,
    high: String,
    low: String,
    close: String,
    change: String,
    percent_change: String,
    positive: bool,
}

impl From<&Quote> for QuoteCard {
    fn from(quote: &Quote) -> Self {
        Self {
            symbol: quote.symbol.to_string(),
            open: format::price(quote.open),
            high: format::price(quote.high),
            low: format::price(quote.low),
            close: format::price(quote.close),
            change: format::signed(quote.change),
            percent_change: format::signed_percent(quote.percent_change),
            positive: quote.is_positive(),
        }
    }
}

/// GET / : page d'accueil, depuis le cache ou l'API
#[get("/")]
pub async fn index(state: web::Data<AppState>, templates: web::Data<Templates>) -> impl Responder {
    let view = state.load_dashboard().await;
    let cards: Vec<QuoteCard> = view.quotes.iter().map(QuoteCard::from).collect();

    let mut context = Context::new();
    context.insert("stocks", &cards);
    context.insert("updated_time", &view.updated_time);
    context.insert("from_cache", &view.from_cache);
    render_html(&templates, INDEX, &context, StatusCode::OK)
}

/// GET /stock_data : cotations fraîches, "N/A" pour les échecs
#[get("/stock_data")]
pub async fn stock_data(state: web::Data<AppState>) -> impl Responder {
    let entries: Vec<DashboardEntry> = state.fetch_all_quotes().await;
    HttpResponse::Ok().json(entries)
}

// ============================================================================
// Historique
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    symbol: Option<String>,
    range: Option<String>,
    interval: Option<String>,
}

/// GET /chart-data : série de clôtures d'un symbole
#[get("/chart-data")]
pub async fn chart_data(state: web::Data<AppState>, query: web::Query<ChartQuery>) -> impl Responder {
    let query = query.into_inner();
    let symbol = match Symbol::parse(query.symbol.as_deref().unwrap_or(DEFAULT_CHART_SYMBOL)) {
        Ok(symbol) => symbol,
        Err(e) => return error_json(&e),
    };
    let range = query.range.as_deref().unwrap_or(DEFAULT_CHART_RANGE);
    let interval = query.interval.as_deref().unwrap_or(DEFAULT_CHART_INTERVAL);

    match state.charts.fetch_chart(&symbol, range, interval).await {
        Ok(series) => HttpResponse::Ok().json(series),
        Err(e) => {
            warn!(ticker = %symbol, error = %e, "Chart data request failed");
            error_json(&e)
        }
    }
}

// ============================================================================
// Comparaison historique
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ComparisonQuery {
    symbols: Option<String>,
    investment: Option<String>,
    years: Option<String>,
}

impl ComparisonQuery {
    /// Valide la requête avant tout appel amont
    fn parse(&self) -> Result<(Vec<Symbol>, f64, u32), MarketError> {
        let symbols = Symbol::parse_list(self.symbols.as_deref().unwrap_or(""))?;

        let investment = self.investment.as_deref().unwrap_or(DEFAULT_INVESTMENT);
        let years = self.years.as_deref().unwrap_or(DEFAULT_YEARS);
        let invalid = || {
            MarketError::InvalidInput(format!(
                "Invalid investment or years: investment={}, years={}",
                investment, years
            ))
        };

        let investment = investment.trim().parse::<f64>().map_err(|_| invalid())?;
        let years = years.trim().parse::<u32>().map_err(|_| invalid())?;
        Ok((symbols, investment, years))
    }
}

/// GET /api/calculate_comparison : tableau + séries normalisées
#[get("/api/calculate_comparison")]
pub async fn calculate_comparison(
    state: web::Data<AppState>,
    query: web::Query<ComparisonQuery>,
) -> impl Responder {
    let (symbols, investment, years) = match query.parse() {
        Ok(parsed) => parsed,
        Err(e) => return error_json(&e),
    };

    match compare::compare(&state.charts, &state.spacing, &symbols, investment, years).await {
        Ok(report) => {
            info!(
                symbols = report.rows.len(),
                charted = report.chart_series.len(),
                "Comparison served"
            );
            HttpResponse::Ok().json(report)
        }
        Err(e) => error_json(&e),
    }
}

// ============================================================================
// Comparateur manuel (formulaire)
// ============================================================================

/// Une ligne du formulaire telle que saisie (renvoyée en cas d'erreur)
#[derive(Debug, Default, Clone, Serialize)]
struct FormEntry {
    symbol: String,
    investment: String,
    annual_yield: String,
}

impl FormEntry {
    fn is_blank(&self) -> bool {
        self.symbol.trim().is_empty()
            && self.investment.trim().is_empty()
            && self.annual_yield.trim().is_empty()
    }
}

/// Contenu brut du POST /compare_stocks
///
/// CONCEPT RUST : form_urlencoded
/// - Les clés `symbols[]` se répètent ; web::Form ne gère pas les listes,
///   on parcourt donc les paires du corps une à une
#[derive(Debug, Default)]
struct ManualForm {
    entries: Vec<FormEntry>,
    period: String,
}

impl ManualForm {
    fn from_body(body: &[u8]) -> Self {
        let mut symbols = Vec::new();
        let mut investments = Vec::new();
        let mut annual_yields = Vec::new();
        let mut period = String::new();

        for (key, value) in form_urlencoded::parse(body) {
            match key.as_ref() {
                "symbols[]" => symbols.push(value.into_owned()),
                "investments[]" => investments.push(value.into_owned()),
                "annual_yields[]" => annual_yields.push(value.into_owned()),
                "period" => period = value.into_owned(),
                _ => {}
            }
        }

        let rows = symbols.len().max(investments.len()).max(annual_yields.len());
        let entries = (0..rows)
            .map(|i| FormEntry {
                symbol: symbols.get(i).cloned().unwrap_or_default(),
                investment: investments.get(i).cloned().unwrap_or_default(),
                annual_yield: annual_yields.get(i).cloned().unwrap_or_default(),
            })
            .filter(|entry| !entry.is_blank())
            .collect();

        Self { entries, period }
    }

    fn evaluate(&self) -> Result<(Vec<ManualComparisonRow>, u32), MarketError> {
        let mut symbols = Vec::with_capacity(self.entries.len());
        let mut investments = Vec::with_capacity(self.entries.len());
        let mut annual_yields = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            let symbol = Symbol::parse(&entry.symbol)?;
            investments.push(parse_number("investment", &symbol, &entry.investment)?);
            annual_yields.push(parse_number("annual yield", &symbol, &entry.annual_yield)?);
            symbols.push(symbol);
        }

        let period = self.period.trim().parse::<u32>().map_err(|_| {
            MarketError::InvalidInput("period must be a positive whole number of years".to_string())
        })?;

        let rows = compare_manual_batch(&symbols, &investments, &annual_yields, period)?;
        Ok((rows, period))
    }
}

fn parse_number(field: &str, symbol: &Symbol, raw: &str) -> Result<f64, MarketError> {
    raw.trim().parse::<f64>().map_err(|_| {
        MarketError::InvalidInput(format!("{} for {} must be a number, got {:?}", field, symbol, raw))
    })
}

/// Ligne du tableau de résultats, valeurs déjà formatées
#[derive(Debug, Serialize)]
struct ManualRowView {
    symbol: String,
    investment: String,
    annual_yield: String,
    value_no_drip: String,
    value_with_drip: String,
}

impl From<&ManualComparisonRow> for ManualRowView {
    fn from(row: &ManualComparisonRow) -> Self {
        Self {
            symbol: row.symbol.to_string(),
            investment: format::thousands(row.investment),
            annual_yield: format::yield_percent(row.annual_yield_percent),
            value_no_drip: format::thousands(row.value_no_drip),
            value_with_drip: format::thousands(row.value_with_drip),
        }
    }
}

/// GET /compare_stocks : formulaire vide
#[get("/compare_stocks")]
pub async fn compare_stocks_form(templates: web::Data<Templates>) -> impl Responder {
    render_html(&templates, COMPARISON_FORM, &Context::new(), StatusCode::OK)
}

/// POST /compare_stocks : calcule et affiche le tableau
#[post("/compare_stocks")]
pub async fn compare_stocks_submit(templates: web::Data<Templates>, body: web::Bytes) -> impl Responder {
    let form = ManualForm::from_body(&body);

    let mut context = Context::new();
    context.insert("entries", &form.entries);

    match form.evaluate() {
        Ok((rows, period)) => {
            let views: Vec<ManualRowView> = rows.iter().map(ManualRowView::from).collect();
            context.insert("rows", &views);
            context.insert("period", &period);
            render_html(&templates, COMPARISON_FORM, &context, StatusCode::OK)
        }
        Err(e) => {
            warn!(error = %e, "Manual comparison rejected");
            context.insert("error", &e.to_string());
            context.insert("period", form.period.trim());
            render_html(&templates, COMPARISON_FORM, &context, StatusCode::BAD_REQUEST)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
