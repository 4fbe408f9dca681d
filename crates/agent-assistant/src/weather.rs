//! OpenWeather current-weather lookup
//!
//! API keys are issued at <https://openweathermap.org/>. A freshly issued
//! key can take a while to activate; until then the API answers 401.

use agent_core::Result as AgentResult;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::error::{AssistantError, Result};

/// Default OpenWeather endpoint
pub const OPENWEATHER_BASE_URL: &str = "http://api.openweathermap.org";

const WEATHER_PATH: &str = "/data/2.5/weather";

const TOOL_DESCRIPTION: &str = "When a user asks for the weather, the OpenWeather API searches for \
the city name the user is asking about in English.\n\n\
Args:\n    city (str): The name of city.\n\n\
Returns:\n    json: Weather response";

/// OpenWeather client
///
/// The response body is returned as parsed, whatever the status code: an
/// invalid key yields the API's `{"cod": 401, ...}` payload, not an error.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl WeatherClient {
    /// Create a client for the public OpenWeather endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: OPENWEATHER_BASE_URL.to_string(),
        }
    }

    /// Point the client at another server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the current weather for `city`
    ///
    /// Issues exactly one GET request. Fails only when the request cannot
    /// be sent or the body is not JSON.
    #[instrument(skip(self))]
    pub async fn get_weather(&self, city: &str) -> Result<Value> {
        let url = format!("{}{WEATHER_PATH}", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        debug!(status = %response.status(), "OpenWeather responded");
        Ok(response.json::<Value>().await?)
    }
}

#[derive(Debug, Deserialize)]
struct WeatherParams {
    city: String,
}

/// The `get_weather` tool
#[derive(Debug, Clone)]
pub struct WeatherTool {
    client: WeatherClient,
}

impl WeatherTool {
    pub fn new(client: WeatherClient) -> Self {
        Self { client }
    }

    async fn lookup(&self, params: Value) -> Result<Value> {
        let params: WeatherParams = serde_json::from_value(params)
            .map_err(|e| AssistantError::Config(format!("Invalid parameters: {e}")))?;
        let city = params.city.trim();
        if city.is_empty() {
            return Err(AssistantError::Config("city must not be empty".to_string()));
        }
        self.client.get_weather(city).await
    }
}

#[async_trait]
impl Tool for WeatherTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        Ok(self.lookup(params).await?)
    }

    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        TOOL_DESCRIPTION
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "The name of city."
                }
            },
            "required": ["city"]
        })
    }
}
