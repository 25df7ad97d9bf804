use std::sync::{Arc, Mutex};

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, post, put, web};
use serde::{Deserialize, Serialize};

use rs_lm_core::LmError;
use rs_lm_core::io::{CORPUS_EXTENSION, list_corpora, load_sentences};
use rs_lm_core::model::{Decoding, GenerationInput, LanguageModel, ModelConfig};

mod config;

use config::ServerConfig;

/// Query parameters of `PUT /v1/train`; `order` and `laplace` are read
/// from the same query string as a `ModelConfig`.
#[derive(Deserialize)]
struct TrainParams {
	name: Option<String>,
}

/// Query parameters of `GET /v1/generate`
#[derive(Deserialize)]
struct GenerateParams {
	count: Option<usize>,
	min_len: Option<usize>,
	max_len: Option<usize>,
	seed: Option<u64>, // absent -> greedy
	exclude_unknown: Option<bool>,
}

/// Query parameters of `GET /v1/probability`
#[derive(Deserialize)]
struct ProbabilityParams {
	ngram: Option<String>, // comma separated tokens
}

#[derive(Serialize)]
struct ModelInfo {
	name: String,
	config: ModelConfig,
	vocabulary_size: usize,
	table_size: usize,
}

#[derive(Serialize)]
struct ProbabilityResponse {
	ngram: Vec<String>,
	probability: f64,
}

#[derive(Serialize)]
struct PerplexityResponse {
	sentences: usize,
	perplexity: f64,
}

/// The trained model is swapped as a whole; handlers clone the `Arc` and
/// release the lock before scoring.
struct SharedData {
	config: ServerConfig,
	model: Mutex<Option<(String, Arc<LanguageModel>)>>,
}

impl GenerateParams {
	fn generation_input(&self) -> Result<GenerationInput, LmError> {
		let default = GenerationInput::default();
		let mut input = GenerationInput::new(self.count.unwrap_or(default.count()))?;
		input.set_length_bounds(self.min_len.unwrap_or(default.min_len()), self.max_len.unwrap_or(default.max_len()))?;
		input.exclude_unknown = self.exclude_unknown.unwrap_or(false);
		if let Some(seed) = self.seed {
			input.decoding = Decoding::Sampled(seed);
		}
		Ok(input)
	}
}

fn error_response(error: LmError) -> HttpResponse {
	HttpResponse::BadRequest().body(error.to_string())
}

/// Returns the loaded model, or the response to send when there is none.
fn current_model(data: &SharedData) -> Result<(String, Arc<LanguageModel>), HttpResponse> {
	let model = match data.model.lock() {
		Ok(m) => m,
		Err(_) => return Err(HttpResponse::InternalServerError().body("Model lock failed")),
	};
	match model.as_ref() {
		Some((name, model)) => Ok((name.clone(), Arc::clone(model))),
		None => Err(HttpResponse::Conflict().body("No model trained, call PUT /v1/train first")),
	}
}

/// HTTP PUT endpoint `/v1/train`
///
/// Loads `<data_dir>/<name>.txt`, trains a model and replaces the current one.
#[put("/v1/train")]
async fn put_train(
	data: web::Data<SharedData>,
	query: web::Query<TrainParams>,
	model_config: web::Query<ModelConfig>,
) -> impl Responder {
	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim().to_owned(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let path = data.config.data_dir.join(format!("{name}.{CORPUS_EXTENSION}"));
	let sentences = match load_sentences(&path, data.config.delimiter) {
		Ok(s) => s,
		Err(e) => return HttpResponse::NotFound().body(format!("Failed to load corpus {name}: {e}")),
	};

	let model = match LanguageModel::with_config(&sentences, &model_config.into_inner()) {
		Ok(m) => m,
		Err(e) => return error_response(e),
	};

	let mut current = match data.model.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	log::info!("serving {}-gram model trained on {name}", model.order());
	*current = Some((name, Arc::new(model)));

	HttpResponse::Ok().body("Model trained successfully")
}

#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<SharedData>) -> impl Responder {
	match list_corpora(&data.config.data_dir, CORPUS_EXTENSION) {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

#[get("/v1/model")]
async fn get_model(data: web::Data<SharedData>) -> impl Responder {
	let (name, model) = match current_model(&data) {
		Ok(m) => m,
		Err(response) => return response,
	};
	HttpResponse::Ok().json(ModelInfo {
		name,
		config: *model.config(),
		vocabulary_size: model.vocabulary_size(),
		table_size: model.table().len(),
	})
}

#[get("/v1/probability")]
async fn get_probability(data: web::Data<SharedData>, query: web::Query<ProbabilityParams>) -> impl Responder {
	let (_, model) = match current_model(&data) {
		Ok(m) => m,
		Err(response) => return response,
	};
	let ngram: Vec<String> = match &query.ngram {
		Some(s) => s.split(',').map(|t| t.trim().to_owned()).filter(|t| !t.is_empty()).collect(),
		None => return HttpResponse::BadRequest().body("Missing ngram"),
	};
	match model.probability(&ngram) {
		Ok(probability) => HttpResponse::Ok().json(ProbabilityResponse { ngram, probability }),
		Err(e) => error_response(e),
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Greedy generation unless a `seed` is given, in which case tokens are sampled.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let (_, model) = match current_model(&data) {
		Ok(m) => m,
		Err(response) => return response,
	};
	let input = match query.generation_input() {
		Ok(input) => input,
		Err(e) => return error_response(e),
	};
	match model.generate(&input) {
		Ok(sentences) => HttpResponse::Ok().json(sentences),
		Err(e) => error_response(e),
	}
}

/// HTTP POST endpoint `/v1/perplexity`
///
/// The body holds one test sentence per line.
#[post("/v1/perplexity")]
async fn post_perplexity(data: web::Data<SharedData>, body: String) -> impl Responder {
	let (_, model) = match current_model(&data) {
		Ok(m) => m,
		Err(response) => return response,
	};
	let sentences: Vec<&str> = body.lines().map(str::trim).filter(|s| !s.is_empty()).collect();
	match model.perplexity(&sentences) {
		Ok(perplexity) => HttpResponse::Ok().json(PerplexityResponse { sentences: sentences.len(), perplexity }),
		Err(e) => error_response(e),
	}
}

/// Main entry point for the server.
///
/// Reads `RS_LM_*` settings, starts with no model and serves until stopped.
/// `RUST_LOG` controls log verbosity (default `info`).
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = ServerConfig::from_env().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
	let bind = (config.host.clone(), config.port);
	log::info!("listening on {}:{}, corpora in {}", bind.0, bind.1, config.data_dir.display());

	let shared_data = web::Data::new(SharedData { config, model: Mutex::new(None) });

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.service(put_train)
			.service(get_corpora)
			.service(get_model)
			.service(get_probability)
			.service(get_generated)
			.service(post_perplexity)
	})
		.bind(bind)?
		.run()
		.await
}
