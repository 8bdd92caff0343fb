// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use regform_app::{CountryEntry, ReferenceData, RegionTree};
use reqwest::blocking::Client as HttpClient;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use url::Url;

pub const DEFAULT_COUNTRIES_SOURCE: &str = "data/countries.json";
pub const DEFAULT_REGIONS_SOURCE: &str = "data/provinces.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    Empty,
    InvalidUrl(String),
    UnsupportedScheme(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("reference data location is empty"),
            Self::InvalidUrl(raw) => write!(f, "invalid reference data URL {raw:?}"),
            Self::UnsupportedScheme(scheme) => write!(
                f,
                "unsupported URL scheme {scheme:?}; use http(s):// or a filesystem path"
            ),
        }
    }
}

impl std::error::Error for SourceError {}

/// Where one reference table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceSource {
    Http(Url),
    File(PathBuf),
}

impl ReferenceSource {
    pub fn parse(raw: &str) -> Result<Self, SourceError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SourceError::Empty);
        }
        let Some((scheme, _)) = trimmed.split_once("://") else {
            return Ok(Self::File(PathBuf::from(trimmed)));
        };
        if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
            return Err(SourceError::UnsupportedScheme(scheme.to_owned()));
        }
        Url::parse(trimmed)
            .map(Self::Http)
            .map_err(|_| SourceError::InvalidUrl(trimmed.to_owned()))
    }
}

impl fmt::Display for ReferenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSources {
    pub countries: ReferenceSource,
    pub regions: ReferenceSource,
}

impl ReferenceSources {
    pub fn parse(countries: &str, regions: &str) -> Result<Self> {
        Ok(Self {
            countries: ReferenceSource::parse(countries)
                .with_context(|| format!("parse country table location {countries:?}"))?,
            regions: ReferenceSource::parse(regions)
                .with_context(|| format!("parse region tree location {regions:?}"))?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Loader {
    http: HttpClient,
}

impl Loader {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;
        Ok(Self { http })
    }

    /// Loads both tables concurrently. A table that fails to load is logged and
    /// replaced by an empty one so the form still renders.
    pub fn load(&self, sources: &ReferenceSources) -> ReferenceData {
        let (countries, regions) = self.fetch_both(sources);
        let countries = countries.unwrap_or_else(|error| {
            log::error!("load country table from {}: {error:#}", sources.countries);
            Vec::new()
        });
        let regions = regions.unwrap_or_else(|error| {
            log::error!("load region tree from {}: {error:#}", sources.regions);
            RegionTree::new()
        });
        log::info!(
            "loaded {} countries and {} region entries",
            countries.len(),
            regions.len()
        );
        ReferenceData::new(countries, regions)
    }

    pub fn load_strict(&self, sources: &ReferenceSources) -> Result<ReferenceData> {
        let (countries, regions) = self.fetch_both(sources);
        Ok(ReferenceData::new(countries?, regions?))
    }

    pub fn fetch_countries(&self, source: &ReferenceSource) -> Result<Vec<CountryEntry>> {
        let raw = self.fetch_text(source)?;
        serde_json::from_str(&raw).with_context(|| format!("decode country table {source}"))
    }

    pub fn fetch_regions(&self, source: &ReferenceSource) -> Result<RegionTree> {
        let raw = self.fetch_text(source)?;
        serde_json::from_str(&raw).with_context(|| format!("decode region tree {source}"))
    }

    pub fn fetch_text(&self, source: &ReferenceSource) -> Result<String> {
        match source {
            ReferenceSource::File(path) => fs::read_to_string(path)
                .with_context(|| format!("read reference file {}", path.display())),
            ReferenceSource::Http(url) => {
                let response = self
                    .http
                    .get(url.clone())
                    .send()
                    .with_context(|| format!("GET {url} -- check that the data server is up"))?;
                let status = response.status();
                if !status.is_success() {
                    bail!("GET {url} returned {status}");
                }
                response
                    .text()
                    .with_context(|| format!("read response body from {url}"))
            }
        }
    }

    fn fetch_both(
        &self,
        sources: &ReferenceSources,
    ) -> (Result<Vec<CountryEntry>>, Result<RegionTree>) {
        thread::scope(|scope| {
            let countries = scope.spawn(|| self.fetch_countries(&sources.countries));
            let regions = self.fetch_regions(&sources.regions);
            let countries = countries
                .join()
                .unwrap_or_else(|_| Err(anyhow!("country table fetch panicked")));
            (countries, regions)
        })
    }
}
