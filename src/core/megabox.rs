use crate::config::toml_config::ChainSettings;
use crate::core::client;
use crate::core::lookup::resolve_query;
use crate::domain::model::{
    lenient_count, lenient_text, Chain, ResolvedQuery, ScheduleQuery, Showtime,
};
use crate::domain::ports::{ScheduleSource, Storage};
use crate::utils::error::{Result, ShowtimeError};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Body of `selectBokdList.do` for a single theater and movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingListRequest {
    #[serde(rename = "arrMovieNo")]
    pub arr_movie_no: String,
    #[serde(rename = "playDe")]
    pub play_de: String,
    #[serde(rename = "brchNoListCnt")]
    pub brch_no_list_cnt: u32,
    #[serde(rename = "brchNo1")]
    pub brch_no1: String,
    #[serde(rename = "movieNo1")]
    pub movie_no1: String,
}

impl BookingListRequest {
    pub fn new(query: &ResolvedQuery) -> Self {
        Self {
            arr_movie_no: query.movie_code.clone(),
            play_de: query.date.format("%Y%m%d").to_string(),
            brch_no_list_cnt: 1,
            brch_no1: query.theater_code.clone(),
            movie_no1: query.movie_code.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BookingListResponse {
    #[serde(rename = "movieFormList", default)]
    movie_form_list: Option<Vec<MovieForm>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovieForm {
    #[serde(default, deserialize_with = "lenient_text")]
    play_start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    play_end_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    movie_nm: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    theab_expo_nm: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    rest_seat_cnt: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    tot_seat_cnt: Option<u32>,
}

impl From<MovieForm> for Showtime {
    fn from(form: MovieForm) -> Self {
        Showtime {
            movie_name: form.movie_nm,
            start_time: form.play_start_time,
            end_time: form.play_end_time,
            screen_name: form.theab_expo_nm,
            remaining_seats: form.rest_seat_cnt,
            total_seats: form.tot_seat_cnt,
        }
    }
}

/// Extracts `movieFormList`; a missing or null list means nothing is scheduled.
pub fn parse_showtimes(body: serde_json::Value) -> Result<Vec<Showtime>> {
    let response: BookingListResponse =
        serde_json::from_value(body).map_err(|e| ShowtimeError::ResponseFormatError {
            message: format!("unexpected Megabox payload: {}", e),
        })?;

    Ok(response
        .movie_form_list
        .unwrap_or_default()
        .into_iter()
        .map(Showtime::from)
        .collect())
}

pub struct MegaboxClient<S: Storage> {
    storage: S,
    settings: ChainSettings,
    client: Client,
}

impl<S: Storage> MegaboxClient<S> {
    pub fn new(storage: S, settings: ChainSettings) -> Result<Self> {
        let client = client::build_client(&settings)?;
        Ok(Self {
            storage,
            settings,
            client,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage> ScheduleSource for MegaboxClient<S> {
    fn chain(&self) -> Chain {
        Chain::Megabox
    }

    async fn resolve(&self, query: &ScheduleQuery) -> Result<ResolvedQuery> {
        resolve_query(&self.storage, &self.settings, query).await
    }

    async fn fetch(&self, query: &ResolvedQuery) -> Result<Vec<Showtime>> {
        let payload = BookingListRequest::new(query);
        tracing::debug!("Megabox payload: {:?}", payload);

        let request = client::with_headers(self.client.post(&self.settings.endpoint), &self.settings)
            .json(&payload);
        let body = client::send_for_json(request, &self.settings.endpoint).await?;

        parse_showtimes(body)
    }
}
