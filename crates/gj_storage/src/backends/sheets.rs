use async_trait::async_trait;
use chrono::Utc;
use gj_core::{Error, JobBatch, JobRecord, JobSink, Result};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use crate::backends::backup::write_csv_backup;

pub const DEFAULT_WORKSHEET: &str = "Jobs";
pub const DEFAULT_BACKUP_PATH: &str = "jobs_backup.csv";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const SHEETS_ENDPOINT: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a Google service-account key file this sink needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Everything needed to reach the spreadsheet. Built and validated before
/// any scraping starts.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub credentials: ServiceAccountKey,
    pub spreadsheet_id: String,
    pub worksheet: String,
}

impl SheetsConfig {
    pub fn new(credentials: Option<&str>, spreadsheet_id: Option<&str>) -> Result<Self> {
        let credentials = credentials
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::Config("GOOGLE_CREDENTIALS is not set".to_string()))?;
        let spreadsheet_id = spreadsheet_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Config("SPREADSHEET_ID is not set".to_string()))?;

        let credentials: ServiceAccountKey = serde_json::from_str(credentials)
            .map_err(|e| Error::Config(format!("GOOGLE_CREDENTIALS is not a service account key: {}", e)))?;
        if credentials.client_email.is_empty() || credentials.private_key.is_empty() {
            return Err(Error::Config(
                "GOOGLE_CREDENTIALS is missing client_email or private_key".to_string(),
            ));
        }

        Ok(Self {
            credentials,
            spreadsheet_id: spreadsheet_id.to_string(),
            worksheet: DEFAULT_WORKSHEET.to_string(),
        })
    }
}

/// The two spreadsheet operations a run needs.
#[async_trait]
pub trait SheetsApi: Send + Sync {
    /// Removes every value from the worksheet
    async fn clear(&self, worksheet: &str) -> Result<()>;

    /// Writes `rows` starting at the top-left cell
    async fn update(&self, worksheet: &str, rows: &[Vec<String>]) -> Result<()>;
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Sheets v4 REST client authenticated as a service account.
pub struct GoogleSheetsClient {
    http: Client,
    key: ServiceAccountKey,
    spreadsheet_id: String,
    token: Mutex<Option<String>>,
}

impl GoogleSheetsClient {
    pub fn new(config: &SheetsConfig) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            key: config.credentials.clone(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            token: Mutex::new(None),
        })
    }

    fn assertion(&self) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };
        let key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| Error::Auth(format!("Invalid private key: {}", e)))?;
        encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| Error::Auth(format!("Failed to sign token request: {}", e)))
    }

    /// Exchanges a signed assertion for an access token, once per client.
    async fn access_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if let Some(token) = token.as_ref() {
            return Ok(token.clone());
        }

        debug!("Requesting access token for {}", self.key.client_email);
        let assertion = self.assertion()?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Auth(format!("Token request rejected: {}", e)))?;
        let access_token = response.json::<TokenResponse>().await?.access_token;

        *token = Some(access_token.clone());
        Ok(access_token)
    }

    fn values_url(&self, range: &str) -> String {
        format!("{}/{}/values/{}", SHEETS_ENDPOINT, self.spreadsheet_id, range)
    }
}

#[async_trait]
impl SheetsApi for GoogleSheetsClient {
    async fn clear(&self, worksheet: &str) -> Result<()> {
        let token = self.access_token().await?;
        self.http
            .post(format!("{}:clear", self.values_url(worksheet)))
            .bearer_auth(token)
            .json(&json!({}))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn update(&self, worksheet: &str, rows: &[Vec<String>]) -> Result<()> {
        let token = self.access_token().await?;
        let range = format!("{}!A1", worksheet);
        self.http
            .put(self.values_url(&range))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(token)
            .json(&json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": rows,
            }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Replaces the worksheet contents with the batch. When the spreadsheet
/// cannot be written the same rows go to a local CSV file instead.
pub struct SheetsSink {
    api: Box<dyn SheetsApi>,
    worksheet: String,
    backup_path: PathBuf,
}

impl SheetsSink {
    pub fn new(config: &SheetsConfig) -> Result<Self> {
        Ok(Self::with_api(
            Box::new(GoogleSheetsClient::new(config)?),
            config.worksheet.clone(),
        ))
    }

    pub fn with_api(api: Box<dyn SheetsApi>, worksheet: impl Into<String>) -> Self {
        Self {
            api,
            worksheet: worksheet.into(),
            backup_path: PathBuf::from(DEFAULT_BACKUP_PATH),
        }
    }

    pub fn with_backup_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.backup_path = path.into();
        self
    }

    async fn push(&self, batch: &JobBatch) -> Result<()> {
        let mut rows: Vec<Vec<String>> = Vec::with_capacity(batch.jobs.len() + 1);
        rows.push(JobRecord::HEADERS.iter().map(|h| h.to_string()).collect());
        rows.extend(batch.rows());

        self.api.clear(&self.worksheet).await?;
        self.api.update(&self.worksheet, &rows).await
    }
}

#[async_trait]
impl JobSink for SheetsSink {
    fn name(&self) -> &str {
        "Google Sheets"
    }

    async fn write_batch(&self, batch: &JobBatch) -> Result<()> {
        match self.push(batch).await {
            Ok(()) => {
                info!("✅ Wrote {} rows to worksheet {}", batch.total_jobs, self.worksheet);
                Ok(())
            }
            Err(e) => {
                error!("❌ Error writing to Google Sheets: {}", e);
                warn!("Saving backup to {}", self.backup_path.display());
                write_csv_backup(&self.backup_path, batch)?;
                info!("✅ Backup saved to {}", self.backup_path.display());
                Ok(())
            }
        }
    }
}
