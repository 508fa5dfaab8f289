// Route tree for every /api group

use std::convert::Infallible;

use warp::http::Method;
use warp::Filter;

use crate::auth::{optional_user, with_auth};
use crate::error::handle_rejection;
use crate::handlers::{self, decoded_param, disease::MAX_UPLOAD_BYTES, json_body};
use crate::state::{with_state, SharedState};

pub fn configure_routes(
    state: SharedState,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Infallible> + Clone {
    let api = warp::path("api");

    // GET /api/health
    let health = api
        .and(warp::path("health"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::health::health);

    let routes = health
        .or(api.and(warp::path("price")).and(price_routes()))
        .or(api.and(warp::path("chatbot")).and(chatbot_routes(state.clone())))
        .or(api.and(warp::path("disease")).and(disease_routes(state.clone())))
        .or(api.and(warp::path("schemes")).and(scheme_routes()))
        .or(api.and(warp::path("farmstories")).and(story_routes(state.clone())))
        .or(api.and(warp::path("profile")).and(profile_routes(state.clone())))
        .or(api
            .and(warp::path("recommendations"))
            .and(recommendation_routes(state.clone())));

    // The second recover renders CORS refusals, which the cors wrapper raises itself
    routes
        .recover(handle_rejection)
        .with(cors(&state.config.allowed_origins))
        .recover(handle_rejection)
        .with(warp::trace::request())
}

fn cors(allowed_origins: &[String]) -> warp::cors::Builder {
    let cors = warp::cors()
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(vec!["content-type", "authorization"]);
    if allowed_origins.is_empty() {
        cors.allow_any_origin()
    } else {
        cors.allow_origins(allowed_origins.iter().map(String::as_str))
    }
}

fn price_routes() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    // POST /predict
    let predict = warp::path("predict")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and_then(handlers::price::predict);

    // GET /market-prices?state&market
    let market_prices = warp::path("market-prices")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<handlers::price::LocationQuery>())
        .and_then(handlers::price::market_prices);

    // GET /states
    let states = warp::path("states")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::price::states);

    // GET /markets/{state}
    let markets = warp::path("markets")
        .and(decoded_param())
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::price::markets);

    // GET /crops
    let crops = warp::path("crops")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::price::crops);

    // POST /compare
    let compare = warp::path("compare")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and_then(handlers::price::compare);

    predict
        .or(market_prices)
        .or(states)
        .or(markets)
        .or(crops)
        .or(compare)
}

fn chatbot_routes(
    state: SharedState,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    // POST /chat
    let chat = warp::path("chat")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and(optional_user(state.clone()))
        .and(with_state(state.clone()))
        .and_then(handlers::chatbot::chat);

    // GET /topics
    let topics = warp::path("topics")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::chatbot::topics);

    // GET /languages
    let languages = warp::path("languages")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::chatbot::languages);

    // GET /history
    let history = warp::path("history")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_auth(state.clone()))
        .and(with_state(state))
        .and_then(handlers::chatbot::history);

    chat.or(topics).or(languages).or(history)
}

fn disease_routes(
    state: SharedState,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    // POST /detect (multipart)
    let detect = warp::path("detect")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::multipart::form().max_length(MAX_UPLOAD_BYTES))
        .and(optional_user(state.clone()))
        .and(with_state(state.clone()))
        .and_then(handlers::disease::detect);

    // GET /diseases
    let diseases = warp::path("diseases")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::disease::diseases);

    // GET /disease/{key}
    let disease = warp::path("disease")
        .and(decoded_param())
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::disease::disease);

    // GET /history
    let history = warp::path("history")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_auth(state.clone()))
        .and(with_state(state))
        .and_then(handlers::disease::history);

    detect.or(diseases).or(disease).or(history)
}

fn scheme_routes() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    // GET /all?category
    let all = warp::path("all")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<handlers::schemes::CategoryQuery>())
        .and_then(handlers::schemes::all);

    // GET /categories
    let categories = warp::path("categories")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::schemes::categories);

    // POST /check-eligibility
    let eligibility = warp::path("check-eligibility")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and_then(handlers::schemes::check_eligibility);

    // GET /search?q
    let search = warp::path("search")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<handlers::schemes::SearchQuery>())
        .and_then(handlers::schemes::search);

    // GET /{id}
    let scheme = warp::path::param::<u32>()
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::schemes::scheme);

    all.or(categories).or(eligibility).or(search).or(scheme)
}

fn story_routes(
    state: SharedState,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    // GET /feed
    let feed = warp::path("feed")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::stories::feed);

    // GET /story/{id}
    let story = warp::path("story")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::stories::story);

    // POST /like/{id}
    let like = warp::path("like")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state.clone()))
        .and_then(handlers::stories::like);

    // POST /increment-view/{id}
    let view = warp::path("increment-view")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state.clone()))
        .and_then(handlers::stories::increment_view);

    // POST /upload
    let upload = warp::path("upload")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(handlers::stories::upload);

    // GET /trending
    let trending = warp::path("trending")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::stories::trending);

    // GET /search?q&crop&location
    let search = warp::path("search")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<handlers::stories::StorySearchQuery>())
        .and(with_state(state.clone()))
        .and_then(handlers::stories::search);

    // GET /my-stories/{username}
    let mine = warp::path("my-stories")
        .and(decoded_param())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state))
        .and_then(handlers::stories::by_username);

    feed.or(story)
        .or(like)
        .or(view)
        .or(upload)
        .or(trending)
        .or(search)
        .or(mine)
}

fn profile_routes(
    state: SharedState,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    // POST /register
    let register = warp::path("register")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(handlers::profile::register);

    // POST /login
    let login = warp::path("login")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(handlers::profile::login);

    // GET /me
    let me = warp::path("me")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_auth(state.clone()))
        .and(with_state(state.clone()))
        .and_then(handlers::profile::me);

    // PUT /update
    let update = warp::path("update")
        .and(warp::path::end())
        .and(warp::put())
        .and(with_auth(state.clone()))
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(handlers::profile::update);

    // POST /change-password
    let change_password = warp::path("change-password")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_auth(state.clone()))
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(handlers::profile::change_password);

    // DELETE /delete
    let delete = warp::path("delete")
        .and(warp::path::end())
        .and(warp::delete())
        .and(with_auth(state.clone()))
        .and(with_state(state.clone()))
        .and_then(handlers::profile::delete);

    // GET /stats
    let stats = warp::path("stats")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_auth(state.clone()))
        .and(with_state(state.clone()))
        .and_then(handlers::profile::stats);

    // POST /products
    let add_product = warp::path("products")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_auth(state.clone()))
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(handlers::profile::add_product);

    // GET /products
    let products = warp::path("products")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_auth(state.clone()))
        .and(with_state(state))
        .and_then(handlers::profile::products);

    register
        .or(login)
        .or(me)
        .or(update)
        .or(change_password)
        .or(delete)
        .or(stats)
        .or(add_product)
        .or(products)
}

fn recommendation_routes(
    state: SharedState,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    // POST /crop-advice
    let crop_advice = warp::path("crop-advice")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and(with_state(state))
        .and_then(handlers::recommendations::crop_advice);

    // POST /seasonal-calendar
    let calendar = warp::path("seasonal-calendar")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and_then(handlers::recommendations::seasonal_calendar);

    // POST /personalized-tips
    let tips = warp::path("personalized-tips")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and_then(handlers::recommendations::personalized_tips);

    crop_advice.or(calendar).or(tips)
}
