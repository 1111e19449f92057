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

const METHOD_NAME: &str = "GetPlaySequence";
const CHANNEL_TYPE: &str = "HO";
const OS_TYPE: &str = "W";

/// JSON object that travels inside the `paramList` form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaySequenceParams {
    #[serde(rename = "MethodName")]
    pub method_name: String,
    #[serde(rename = "channelType")]
    pub channel_type: String,
    #[serde(rename = "osType")]
    pub os_type: String,
    #[serde(rename = "osVersion")]
    pub os_version: String,
    #[serde(rename = "playDate")]
    pub play_date: String,
    /// `divisionCode|detailDivisionCode|cinemaID`
    #[serde(rename = "cinemaID")]
    pub cinema_id: String,
    #[serde(rename = "representationMovieCode")]
    pub representation_movie_code: String,
}

impl PlaySequenceParams {
    pub fn new(query: &ResolvedQuery, user_agent: &str) -> Self {
        Self {
            method_name: METHOD_NAME.to_string(),
            channel_type: CHANNEL_TYPE.to_string(),
            os_type: OS_TYPE.to_string(),
            os_version: user_agent.to_string(),
            play_date: query.date.format("%Y-%m-%d").to_string(),
            cinema_id: query.theater_code.clone(),
            representation_movie_code: query.movie_code.clone(),
        }
    }

    pub fn to_form(&self) -> Result<[(&'static str, String); 1]> {
        Ok([("paramList", serde_json::to_string(self)?)])
    }
}

#[derive(Debug, Deserialize)]
struct TicketingResponse {
    #[serde(rename = "PlaySeqs", default)]
    play_seqs: Option<PlaySeqs>,
}

#[derive(Debug, Deserialize)]
struct PlaySeqs {
    #[serde(rename = "Items", default)]
    items: Option<Vec<PlaySeqItem>>,
}

#[derive(Debug, Deserialize)]
struct PlaySeqItem {
    #[serde(rename = "MovieNameKR", default, deserialize_with = "lenient_text")]
    movie_name_kr: Option<String>,
    #[serde(rename = "StartTime", default, deserialize_with = "lenient_text")]
    start_time: Option<String>,
    #[serde(rename = "EndTime", default, deserialize_with = "lenient_text")]
    end_time: Option<String>,
    #[serde(rename = "ScreenNameKR", default, deserialize_with = "lenient_text")]
    screen_name_kr: Option<String>,
    #[serde(rename = "TotalSeatCount", default, deserialize_with = "lenient_count")]
    total_seat_count: Option<u32>,
    #[serde(rename = "BookingSeatCount", default, deserialize_with = "lenient_count")]
    booking_seat_count: Option<u32>,
}

impl From<PlaySeqItem> for Showtime {
    fn from(item: PlaySeqItem) -> Self {
        Showtime {
            movie_name: item.movie_name_kr,
            start_time: item.start_time,
            end_time: item.end_time,
            screen_name: item.screen_name_kr,
            // Lotte reports the seats still open for booking here
            remaining_seats: item.booking_seat_count,
            total_seats: item.total_seat_count,
        }
    }
}

/// Extracts `PlaySeqs.Items`; either level missing means nothing is scheduled.
pub fn parse_showtimes(body: serde_json::Value) -> Result<Vec<Showtime>> {
    let response: TicketingResponse =
        serde_json::from_value(body).map_err(|e| ShowtimeError::ResponseFormatError {
            message: format!("unexpected Lotte Cinema payload: {}", e),
        })?;

    Ok(response
        .play_seqs
        .and_then(|seqs| seqs.items)
        .unwrap_or_default()
        .into_iter()
        .map(Showtime::from)
        .collect())
}

pub struct LotteClient<S: Storage> {
    storage: S,
    settings: ChainSettings,
    client: Client,
}

impl<S: Storage> LotteClient<S> {
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
impl<S: Storage> ScheduleSource for LotteClient<S> {
    fn chain(&self) -> Chain {
        Chain::Lotte
    }

    async fn resolve(&self, query: &ScheduleQuery) -> Result<ResolvedQuery> {
        resolve_query(&self.storage, &self.settings, query).await
    }

    async fn fetch(&self, query: &ResolvedQuery) -> Result<Vec<Showtime>> {
        let params = PlaySequenceParams::new(query, self.settings.user_agent());
        tracing::debug!("Lotte Cinema params: {:?}", params);

        let request = client::with_headers(self.client.post(&self.settings.endpoint), &self.settings)
            .form(&params.to_form()?);
        let body = client::send_for_json(request, &self.settings.endpoint).await?;

        parse_showtimes(body)
    }
}
