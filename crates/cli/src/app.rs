//! Command implementations
//!
//! The companion plays the part of the site's calendar widget: it starts the
//! OAuth flow, keeps the token pair in the local token cache and drives the
//! event gateway with it.

use anyhow::{anyhow, bail, Context, Result};
use calendar::templates::find_template;
use calendar::{EventRequest, Reminder};
use chrono::{DateTime, FixedOffset, Local};
use common::config::Config;
use common::{AdSlot, ConsentStore, LocalStorage};
use oauth::{AuthOutcome, TokenCache, TokenPair};
use tracing::{info, warn};

use crate::api::BridgeClient;

pub struct App {
    api: BridgeClient,
    tokens: TokenCache,
    consent: ConsentStore,
    ad_slot: AdSlot,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let storage = match &config.client.storage_dir {
            Some(dir) => LocalStorage::new(dir)?,
            None => LocalStorage::open_default()?,
        };
        let ad_slot = AdSlot {
            min_content_length: config.client.min_content_length,
            ..AdSlot::default()
        };
        Ok(Self::with_storage(
            BridgeClient::new(&config.client.api_url),
            storage,
            ad_slot,
        ))
    }

    pub fn with_storage(api: BridgeClient, storage: LocalStorage, ad_slot: AdSlot) -> Self {
        Self {
            api,
            tokens: TokenCache::new(storage.clone()),
            consent: ConsentStore::new(storage),
            ad_slot,
        }
    }

    /// Fetches the consent URL and opens it in the browser
    pub async fn connect(&self) -> Result<()> {
        let url = self
            .api
            .auth_url()
            .await
            .context("Failed to initiate Google authentication")?;

        println!("Opening Google consent page:\n  {}", url);
        if let Err(e) = open::that(&url) {
            warn!("Could not open browser: {}", e);
            println!("Open the URL above in your browser to continue.");
        }
        println!("When Google sends you back, run `greta complete '<redirect url>'`.");
        Ok(())
    }

    /// Stores the tokens carried by the callback redirect
    pub fn complete(&self, redirect_url: &str) -> Result<TokenPair> {
        match AuthOutcome::from_url(redirect_url)? {
            Some(AuthOutcome::Success(tokens)) => {
                self.tokens.save(&tokens)?;
                info!("Google Calendar connected");
                Ok(tokens)
            }
            Some(AuthOutcome::Failure(reason)) => bail!("Authentication failed: {}", reason),
            None => bail!("The URL carries no authentication result"),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.tokens.is_connected()
    }

    pub fn disconnect(&self) -> Result<bool> {
        self.tokens.clear()
    }

    pub async fn create_reminder(&self, reminder: Reminder) -> Result<String> {
        let tokens = self.connected_tokens()?;
        let request = reminder.to_request(
            Local::now().fixed_offset(),
            tokens.access_token,
            tokens.refresh_token,
        );
        self.create(&request).await
    }

    pub async fn schedule(&self, template_key: &str, start: DateTime<FixedOffset>) -> Result<String> {
        let template = find_template(template_key)
            .ok_or_else(|| anyhow!("Unknown template: {}", template_key))?;
        let tokens = self.connected_tokens()?;
        let request = template.to_request(start, tokens.access_token, tokens.refresh_token);
        self.create(&request).await
    }

    async fn create(&self, request: &EventRequest) -> Result<String> {
        let created = self
            .api
            .create_event(request)
            .await
            .context("Failed to create calendar reminder")?;
        info!("Created event {}", created.event_id);
        Ok(created.event_link)
    }

    pub async fn list_events(&self) -> Result<Vec<calendar::CalendarEventSummary>> {
        let tokens = self.connected_tokens()?;
        self.api
            .list_events(&tokens.access_token, tokens.refresh_token.as_deref())
            .await
            .context("Failed to fetch calendar events")
    }

    pub fn consent(&self) -> Option<bool> {
        self.consent.read()
    }

    pub fn set_consent(&self, allow: bool) -> Result<()> {
        Ok(self.consent.write(allow)?)
    }

    pub fn ads_visible(&self, page_content: &str) -> bool {
        self.ad_slot.is_visible(self.consent.read(), page_content)
    }

    /// The cached pair, provided it has not expired
    fn connected_tokens(&self) -> Result<TokenPair> {
        let tokens = self
            .tokens
            .load()
            .ok_or_else(|| anyhow!("Google Calendar is not connected. Run `greta connect` first."))?;
        if tokens.is_expired() {
            bail!("Google Calendar tokens have expired. Run `greta connect` again.");
        }
        Ok(tokens)
    }
}
