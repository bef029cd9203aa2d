use std::sync::RwLock;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, put, web};
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;

use rs_lyrics_core::config::Config;
use rs_lyrics_core::io::list_corpora;
use rs_lyrics_core::model::context::Order;
use rs_lyrics_core::model::generator::Generator;

/// Environment variable holding the config file path.
const CONFIG_ENV: &str = "RS_LYRICS_CONFIG";
const DEFAULT_CONFIG: &str = "rs-lyrics.toml";

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	order: Option<String>,
	nb_try: Option<usize>,
	seed: Option<u64>,
}

#[derive(Deserialize)]
struct CorpusQuery {
	name: Option<String>,
}

struct SharedData {
	config: Config,
	/// Name of the loaded corpus.
	corpus: String,
	generator: Generator,
}

impl GenerateParams {
	/// Falls back to the config order when none is given.
	fn order(&self, config: &Config) -> Result<Order, String> {
		match &self.order {
			None => Ok(config.order),
			Some(s) => s.parse::<Order>().map_err(|e| e.to_string()),
		}
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates one song from the loaded corpus and returns it as plain text.
/// A `seed` makes the answer reproducible; without one the config seed is
/// used, and without that a fresh random one.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<RwLock<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let mut input = match shared_data.config.generation_input() {
		Ok(i) => i,
		Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
	};
	input.order = match query.order(&shared_data.config) {
		Ok(o) => o,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};
	if let Some(nb_try) = query.nb_try {
		input.nb_try = nb_try;
	}

	let mut rng = match query.seed.or(shared_data.config.seed) {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};

	match shared_data.generator.generate(&input, &mut rng) {
		Ok(song) => HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(song),
		Err(e) => {
			error!("generation failed: {e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

/// HTTP GET endpoint `/v1/stats`: size of the loaded corpus and tables.
#[get("/v1/stats")]
async fn get_stats(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().json(shared_data.generator.stats())
}

#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let data_path = match data.read() {
		Ok(d) => d.config.data_path(),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	match list_corpora(&data_path) {
		Ok(corpora) => HttpResponse::Ok().body(corpora.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

#[get("/v1/loaded_corpus")]
async fn get_loaded_corpus(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	match data.read() {
		Ok(d) => HttpResponse::Ok().body(d.corpus.clone()),
		Err(_) => HttpResponse::InternalServerError().body("Model lock failed"),
	}
}

/// HTTP PUT endpoint `/v1/load_corpus?name=...`
///
/// Builds (or reads from cache) the generator of another corpus of the data
/// directory and swaps it in. Generation keeps using the previous one until
/// the swap.
#[put("/v1/load_corpus")]
async fn put_corpus(data: web::Data<RwLock<SharedData>>, query: web::Query<CorpusQuery>) -> impl Responder {
	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim().to_owned(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};
	if name.contains("..") || name.contains('/') || name.contains('\\') {
		return HttpResponse::BadRequest().body("Corpus name must not be a path");
	}

	let (path, normalization) = match data.read() {
		Ok(d) => (d.config.corpus_path(&name), d.config.normalization),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let generator = match web::block(move || Generator::from_path(path, normalization)).await {
		Ok(Ok(g)) => g,
		Ok(Err(e)) => return HttpResponse::InternalServerError().body(format!("Failed to load corpus: {e}")),
		Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to load corpus: {e}")),
	};

	let mut shared_data = match data.write() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	shared_data.generator = generator;
	shared_data.corpus = name;
	info!("corpus '{}' loaded", shared_data.corpus);

	HttpResponse::Ok().body("Corpus loaded successfully")
}

/// Main entry point for the server.
///
/// Reads the config (path from `RS_LYRICS_CONFIG`, default `rs-lyrics.toml`),
/// loads the configured corpus, and serves it over HTTP.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG.to_owned());
	let config = Config::load(&config_path).map_err(std::io::Error::other)?;

	let generator = Generator::from_path(config.corpus_path(&config.corpus), config.normalization)
		.map_err(std::io::Error::other)?;
	let stats = generator.stats();
	info!(
		"corpus '{}': {} songs, {} unigram / {} bigram contexts",
		config.corpus, stats.songs, stats.unigram_contexts, stats.bigram_contexts
	);

	let bind = (config.server.host.clone(), config.server.port);
	let shared_data = web::Data::new(RwLock::new(SharedData {
		corpus: config.corpus.clone(),
		config,
		generator,
	}));

	info!("listening on {}:{}", bind.0, bind.1);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.service(get_generated)
			.service(get_stats)
			.service(get_corpora)
			.service(get_loaded_corpus)
			.service(put_corpus)
	})
		.bind(bind)?
		.run()
		.await
}
