//! Typed facades for every CourtListener resource.
//!
//! The facades are generated from a single table: each row names the
//! accessor on [`Client`], the facade type and the path segment. Every
//! facade dereferences to [`Endpoint`], so `client.judges().list(..)` and
//! `client.endpoint("judges/").list(..)` send the same request. A few
//! resources add filter shortcuts on top.

use serde_json::Value;
use std::fmt::Display;

use crate::endpoint::Endpoint;
use crate::{filters, Client, Params, Payload, Record, Response, Result};

/// One row of the resource table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// The accessor method on [`Client`].
    pub name: &'static str,
    /// The path segment, relative to the base URL.
    pub segment: &'static str,
}

macro_rules! resources {
    ($( $accessor:ident => $facade:ident, $segment:literal; )*) => {
        $(
            #[doc = concat!("Facade for `", $segment, "`. See [`Client::", stringify!($accessor), "`].")]
            #[derive(Debug, Clone, Copy)]
            pub struct $facade<'c>(Endpoint<'c>);

            impl $facade<'_> {
                /// The path segment of this resource.
                pub const SEGMENT: &'static str = $segment;
            }

            impl<'c> std::ops::Deref for $facade<'c> {
                type Target = Endpoint<'c>;

                fn deref(&self) -> &Self::Target {
                    &self.0
                }
            }
        )*

        impl Client {
            $(
                #[doc = concat!("The `", $segment, "` resource.")]
                pub fn $accessor(&self) -> $facade<'_> {
                    $facade(Endpoint::new(self, $segment))
                }
            )*
        }

        /// Every resource the client knows, in accessor order.
        pub const RESOURCES: &[Resource] = &[
            $( Resource { name: stringify!($accessor), segment: $segment }, )*
        ];
    };
}

resources! {
    aba_ratings => AbaRatings, "aba-ratings/";
    agreements => Agreements, "agreements/";
    alerts => Alerts, "alerts/";
    attorneys => Attorneys, "attorneys/";
    audio => Audio, "audio/";
    citations => Citations, "citations/";
    clusters => Clusters, "clusters/";
    courts => Courts, "courts/";
    debts => Debts, "debts/";
    disclosure_positions => DisclosurePositions, "disclosure-positions/";
    docket_alerts => DocketAlerts, "docket-alerts/";
    docket_entries => DocketEntries, "docket-entries/";
    dockets => Dockets, "dockets/";
    documents => Documents, "documents/";
    educations => Educations, "educations/";
    financial => Financial, "financial/";
    financial_disclosures => FinancialDisclosures, "financial-disclosures/";
    fjc_integrated_database => FjcIntegratedDatabase, "fjc-integrated-database/";
    gifts => Gifts, "gifts/";
    investments => Investments, "investments/";
    judges => Judges, "judges/";
    non_investment_incomes => NonInvestmentIncomes, "non-investment-incomes/";
    opinions => Opinions, "opinions/";
    opinions_cited => OpinionsCited, "opinions-cited/";
    originating_court_information => OriginatingCourtInformation, "originating-court-information/";
    parties => Parties, "parties/";
    people => People, "people/";
    political_affiliations => PoliticalAffiliations, "political-affiliations/";
    positions => Positions, "positions/";
    recap_documents => RecapDocuments, "recap-documents/";
    recap_fetch => RecapFetch, "recap-fetch/";
    recap_query => RecapQuery, "recap-query/";
    reimbursements => Reimbursements, "reimbursements/";
    retention_events => RetentionEvents, "retention-events/";
    schools => Schools, "schools/";
    search => Search, "search/";
    sources => Sources, "sources/";
    spouse_incomes => SpouseIncomes, "spouse-incomes/";
    tag => Tag, "tag/";
}

/// Shortcuts that pre-fill one filter key and call `list`.
///
/// The fixed key goes in first, so an entry for the same key in `params`
/// overrides it.
macro_rules! filter_sugar {
    ($facade:ident { $( $method:ident => $key:literal; )* }) => {
        impl $facade<'_> {
            $(
                #[doc = concat!("Lists records filtered by `", $key, "`.")]
                pub async fn $method(
                    &self,
                    value: impl Into<Value>,
                    params: Params,
                ) -> Result<Response<Payload>> {
                    let params = Params::new().with($key, value).merged(params);
                    self.list(params).await
                }
            )*
        }
    };
}

/// Shortcuts that set one fixed flag and call `list`.
macro_rules! flag_sugar {
    ($facade:ident { $( $method:ident => $key:literal = $value:literal; )* }) => {
        impl $facade<'_> {
            $(
                #[doc = concat!("Lists records with `", $key, "=", $value, "`.")]
                pub async fn $method(&self, params: Params) -> Result<Response<Payload>> {
                    self.list(Params::from([($key, $value)]).merged(params)).await
                }
            )*
        }
    };
}

filter_sugar!(Dockets {
    by_court => "court";
    by_case_type => "case_type";
    by_nature_of_suit => "nature_of_suit";
    by_judge => "assigned_to";
    by_status => "status";
    by_jurisdiction_type => "jurisdiction_type";
    by_jury_demand => "jury_demand";
});

flag_sugar!(Dockets {
    with_financial_disclosures => "has_financial_disclosures" = "true";
    with_audio => "has_audio" = "true";
    with_recap_documents => "has_recap_documents" = "true";
});

filter_sugar!(Opinions {
    by_court => "court";
    by_judge => "author";
    by_type => "type";
    by_jurisdiction => "jurisdiction";
    by_resource_type => "resource_type";
    by_cluster => "cluster";
});

flag_sugar!(Opinions {
    precedential => "stat_Precedential" = "on";
    non_precedential => "stat_Non-Precedential" = "on";
    with_audio => "has_audio" = "true";
});

impl Dockets<'_> {
    /// Lists dockets filed between `start` and `end`, optionally in one court.
    ///
    /// The date and court arguments override the same keys in `params`.
    pub async fn by_date_range(
        &self,
        start: Option<&str>,
        end: Option<&str>,
        court: Option<&str>,
        params: Params,
    ) -> Result<Response<Payload>> {
        let mut params = params.merged(filters::date_range(start, end, "date_filed"));
        if let Some(court) = court.filter(|c| !c.is_empty()) {
            params.insert("court", court);
        }
        self.list(params).await
    }

    /// Looks up a docket by its number, returning the first match.
    ///
    /// ```no_run
    /// # async fn example() -> Result<(), courtlistener::Error> {
    /// let client = courtlistener::Client::from_env()?;
    /// if let Some(docket) = client.dockets().by_docket_number("1:23-cv-00456", Some("nysd")).await? {
    ///     println!("{:?}", docket.get("case_name"));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn by_docket_number(
        &self,
        docket_number: &str,
        court: Option<&str>,
    ) -> Result<Option<Record>> {
        let mut params = Params::from([("docket_number", docket_number)]);
        if let Some(court) = court.filter(|c| !c.is_empty()) {
            params.insert("court", court);
        }

        let response = self.list(params).await?;
        Ok(response
            .results()
            .and_then(|results| results.first())
            .and_then(Value::as_object)
            .cloned())
    }

    /// Entries on one docket.
    pub async fn docket_entries(&self, id: impl Display, params: Params) -> Result<Response<Payload>> {
        self.nested(id, "docket-entries/", params).await
    }

    /// Parties to one docket.
    pub async fn parties(&self, id: impl Display, params: Params) -> Result<Response<Payload>> {
        self.nested(id, "parties/", params).await
    }

    /// Attorneys appearing on one docket.
    pub async fn attorneys(&self, id: impl Display, params: Params) -> Result<Response<Payload>> {
        self.nested(id, "attorneys/", params).await
    }

    /// RECAP documents attached to one docket.
    pub async fn recap_documents(&self, id: impl Display, params: Params) -> Result<Response<Payload>> {
        self.nested(id, "recap/", params).await
    }
}

impl Opinions<'_> {
    /// Lists opinions filed between `start` and `end`. Keys in `params` win.
    pub async fn by_date_range(
        &self,
        start: Option<&str>,
        end: Option<&str>,
        params: Params,
    ) -> Result<Response<Payload>> {
        self.list(filters::date_range(start, end, "date_filed").merged(params))
            .await
    }

    /// The newest opinions first, `limit` per page. Keys in `params` win.
    pub async fn recent(&self, limit: u64, params: Params) -> Result<Response<Payload>> {
        let defaults = Params::new()
            .with("order_by", "-date_filed")
            .with("per_page", limit);
        self.list(defaults.merged(params)).await
    }

    /// Opinions cited at least `min` times, and at most `max` if given.
    /// Keys in `params` win.
    pub async fn by_citation_count(
        &self,
        min: u64,
        max: Option<u64>,
        params: Params,
    ) -> Result<Response<Payload>> {
        let counts = filters::range(Some(min), max, "citation_count");
        self.list(counts.merged(params)).await
    }

    /// Opinions this opinion cites.
    pub async fn cited(&self, id: impl Display, params: Params) -> Result<Response<Payload>> {
        self.nested(id, "cited/", params).await
    }

    /// Opinions citing this opinion.
    pub async fn citing(&self, id: impl Display, params: Params) -> Result<Response<Payload>> {
        self.nested(id, "citing/", params).await
    }

    /// Clusters this opinion belongs to.
    pub async fn clusters(&self, id: impl Display, params: Params) -> Result<Response<Payload>> {
        self.nested(id, "clusters/", params).await
    }
}

impl Courts<'_> {
    /// The court hierarchy.
    pub async fn hierarchy(&self, params: Params) -> Result<Response<Payload>> {
        self.action("hierarchy/", params).await
    }

    /// The available court types.
    pub async fn types(&self, params: Params) -> Result<Response<Payload>> {
        self.action("types/", params).await
    }
}
