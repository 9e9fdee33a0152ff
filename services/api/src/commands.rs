use clap::Args;
use shelter_console::config::{AppConfig, GatewayConfig};
use shelter_console::console::display::{
    allocation_count_badge, blockchain_badge, model_badge, system_badge,
};
use shelter_console::console::{
    AllocationConsole, ConsoleState, ProfileField, ProfileFlag, ProfileForm, Settled,
};
use shelter_console::error::AppError;
use shelter_console::gateway::{
    AllocationRecord, AllocationResult, AssessmentResult, BlockchainTransaction,
    HttpShelterGateway, ShelterGateway, SpecialCircumstance,
};
use shelter_console::telemetry;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct ProfileArgs {
    /// Poverty level percentage (0-100)
    #[arg(long)]
    pub(crate) poverty_level: Option<String>,
    /// Months without employment
    #[arg(long)]
    pub(crate) unemployment_duration: Option<String>,
    /// Household size (at least 1)
    #[arg(long)]
    pub(crate) family_size: Option<String>,
    /// Someone in the household has a disability
    #[arg(long)]
    pub(crate) disability: bool,
    /// Applicant is elderly
    #[arg(long)]
    pub(crate) elderly: bool,
    /// Applicant is a single parent
    #[arg(long)]
    pub(crate) single_parent: bool,
    /// Applicant belongs to a minority group
    #[arg(long)]
    pub(crate) minority: bool,
    /// Special circumstance label or slug (e.g. veteran); repeat to add more
    #[arg(long = "circumstance")]
    pub(crate) circumstances: Vec<SpecialCircumstance>,
}

#[derive(Args, Debug)]
pub(crate) struct AllocateArgs {
    /// Caller-chosen applicant identifier
    #[arg(long, default_value = "")]
    pub(crate) applicant_id: String,
    /// Shelter unit to allocate
    #[arg(long, default_value = "")]
    pub(crate) shelter_unit_id: String,
    #[command(flatten)]
    pub(crate) profile: ProfileArgs,
}

#[derive(Args, Debug)]
pub(crate) struct LookupArgs {
    /// Applicant identifier used when the allocation was recorded
    pub(crate) applicant_id: String,
}

pub(crate) fn load_config(gateway_url: Option<String>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(url) = gateway_url {
        config.gateway.base_url = GatewayConfig::parse_base_url(&url)?;
    }
    Ok(config)
}

fn connect(gateway_url: Option<String>) -> Result<AllocationConsole<HttpShelterGateway>, AppError> {
    let config = load_config(gateway_url)?;
    telemetry::init(&config.telemetry)?;
    let gateway = HttpShelterGateway::new(&config.gateway)?;
    Ok(AllocationConsole::new(Arc::new(gateway)))
}

/// Copy CLI profile inputs into a console draft through the same setters the form uses.
pub(crate) fn apply_profile<G>(console: &mut AllocationConsole<G>, form: ProfileForm, args: ProfileArgs)
where
    G: ShelterGateway + 'static,
{
    let fields = [
        (ProfileField::PovertyLevel, args.poverty_level),
        (ProfileField::UnemploymentDuration, args.unemployment_duration),
        (ProfileField::FamilySize, args.family_size),
    ];
    for (field, raw) in fields {
        if let Some(raw) = raw {
            console.set_profile_field(form, field, &raw);
        }
    }

    console.set_profile_flag(form, ProfileFlag::HasDisability, args.disability);
    console.set_profile_flag(form, ProfileFlag::IsElderly, args.elderly);
    console.set_profile_flag(form, ProfileFlag::IsSingleParent, args.single_parent);
    console.set_profile_flag(form, ProfileFlag::MinorityStatus, args.minority);

    for tag in args.circumstances {
        console.toggle_special_circumstance(tag, form);
    }
}

pub(crate) async fn run_dashboard(gateway_url: Option<String>) -> Result<(), AppError> {
    let mut console = connect(gateway_url)?;
    console.load().await;
    print!("{}", format_dashboard(console.state()));
    Ok(())
}

pub(crate) async fn run_allocate(
    args: AllocateArgs,
    gateway_url: Option<String>,
) -> Result<(), AppError> {
    let mut console = connect(gateway_url)?;
    console.open_allocation();
    console.set_applicant_id(args.applicant_id);
    console.set_shelter_unit_id(args.shelter_unit_id);
    apply_profile(&mut console, ProfileForm::Allocation, args.profile);

    let request = console.begin_allocation().ok_or(AppError::Incomplete(
        "--applicant-id and --shelter-unit-id are required",
    ))?;
    let outcome = console.gateway().allocate_shelter(&request).await;
    let failure = outcome.as_ref().err().cloned();
    console.finish_allocation(outcome);

    if let Some(err) = failure {
        return Err(err.into());
    }
    if let Some(result) = &console.state().allocation.result {
        print!("{}", format_allocation(result));
    }
    Ok(())
}

pub(crate) async fn run_assess(args: ProfileArgs, gateway_url: Option<String>) -> Result<(), AppError> {
    let mut console = connect(gateway_url)?;
    console.open_assessment();
    apply_profile(&mut console, ProfileForm::Assessment, args);

    let profile = console
        .begin_assessment()
        .ok_or(AppError::Incomplete("an assessment is already running"))?;
    let outcome = console.gateway().test_prediction(&profile).await;
    let failure = outcome.as_ref().err().cloned();
    console.finish_assessment(outcome);

    if let Some(err) = failure {
        return Err(err.into());
    }
    if let Some(result) = &console.state().assessment.result {
        print!("{}", format_assessment(result));
    }
    Ok(())
}

pub(crate) async fn run_lookup(args: LookupArgs, gateway_url: Option<String>) -> Result<(), AppError> {
    let mut console = connect(gateway_url)?;
    console.open_lookup();
    console.set_lookup_id(args.applicant_id);

    let applicant_id = console
        .begin_lookup()
        .ok_or(AppError::Incomplete("an applicant id is required"))?;
    let outcome = console.gateway().get_allocation(&applicant_id).await;
    let failure = outcome.as_ref().err().cloned();
    console.finish_lookup(outcome);

    if let Some(err) = failure {
        return Err(err.into());
    }
    if let Some(Settled::Ready(record)) = &console.state().lookup.result {
        print!("{}", format_record(record));
    }
    Ok(())
}

pub(crate) fn format_dashboard(state: &ConsoleState) -> String {
    let mut out = String::from("Shelter allocation dashboard\n");

    match &state.stats {
        Some(Settled::Ready(stats)) => {
            out.push_str(&format!("- {}\n", allocation_count_badge(stats)));
            if let Some(badge) = blockchain_badge(stats) {
                out.push_str(&format!("- {badge}\n"));
            }
            if let Some(badge) = system_badge(stats) {
                out.push_str(&format!("- {badge}\n"));
            }
            let scoring = if stats.model_loaded() { "ML" } else { "Fallback" };
            out.push_str(&format!("- Scoring engine: {scoring}\n"));
        }
        Some(Settled::Failed { error }) => {
            out.push_str(&format!("- Stats unavailable: {error}\n"));
        }
        None => out.push_str("- Stats not loaded\n"),
    }

    match &state.model_status {
        Some(Settled::Ready(status)) => {
            out.push_str(&format!("- {}\n", model_badge(status)));
        }
        Some(Settled::Failed { error }) => {
            out.push_str(&format!("- Model status unavailable: {error}\n"));
        }
        None => out.push_str("- Model status not loaded\n"),
    }

    out
}

pub(crate) fn format_allocation(result: &AllocationResult) -> String {
    let mut out = String::from("Shelter allocated\n");
    out.push_str(&format!("- Applicant ID: {}\n", result.applicant_id));
    out.push_str(&format!("- Shelter Unit: {}\n", result.shelter_unit_id));
    out.push_str(&format!(
        "- Vulnerability Score: {}/100\n",
        result.vulnerability_score
    ));
    out.push_str(&format!(
        "- Priority: {} ({})\n",
        result.priority,
        result.priority.color().hex()
    ));
    if let Some(transaction) = &result.blockchain_transaction {
        out.push_str(&format_blockchain(transaction));
    }
    out
}

pub(crate) fn format_assessment(result: &AssessmentResult) -> String {
    let profile = &result.applicant_data;
    let yes_no = |flag: bool| if flag { "Yes" } else { "No" };

    let mut out = String::from("Vulnerability assessment\n");
    out.push_str(&format!(
        "- Vulnerability Score: {}/100\n",
        result.vulnerability_score
    ));
    out.push_str(&format!(
        "- Priority: {} ({})\n",
        result.priority,
        result.priority.color().hex()
    ));
    out.push_str(&format!("- Prediction Method: {}\n", result.prediction_method));
    out.push_str(&format!("- Poverty Level: {}%\n", profile.poverty_level));
    out.push_str(&format!(
        "- Unemployment: {} months\n",
        profile.unemployment_duration
    ));
    out.push_str(&format!("- Family Size: {}\n", profile.family_size));
    out.push_str(&format!("- Has Disability: {}\n", yes_no(profile.has_disability)));
    out.push_str(&format!("- Is Elderly: {}\n", yes_no(profile.is_elderly)));
    out.push_str(&format!("- Single Parent: {}\n", yes_no(profile.is_single_parent)));
    out.push_str(&format!("- Minority Status: {}\n", yes_no(profile.minority_status)));
    if !profile.special_circumstances.is_empty() {
        let labels: Vec<&str> = profile
            .special_circumstances
            .iter()
            .map(|tag| tag.label())
            .collect();
        out.push_str(&format!("- Special Circumstances: {}\n", labels.join(", ")));
    }
    out
}

pub(crate) fn format_record(record: &AllocationRecord) -> String {
    let or_na = |value: Option<String>| value.unwrap_or_else(|| "N/A".to_string());

    let mut out = String::from("Allocation record\n");
    if record.blockchain_disabled() {
        out.push_str("- Blockchain recording is disabled for this allocation\n");
    }
    out.push_str(&format!(
        "- Applicant ID: {}\n",
        or_na(record.applicant_id.clone())
    ));
    out.push_str(&format!(
        "- Vulnerability Score: {}\n",
        or_na(record.vulnerability_score.map(|score| score.to_string()))
    ));
    out.push_str(&format!(
        "- Priority Level: {}\n",
        or_na(record.priority.map(|priority| priority.to_string()))
    ));
    out.push_str(&format!(
        "- Shelter Unit: {}\n",
        or_na(record.shelter_unit_id.clone())
    ));
    out.push_str(&format!("- Status: {}\n", record.status_label()));
    out.push_str(&format!(
        "- Record Date: {}\n",
        or_na(
            record
                .recorded_at()
                .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
        )
    ));
    if let Some(transaction) = &record.blockchain_transaction {
        out.push_str(&format_blockchain(transaction));
    }
    out
}

fn format_blockchain(transaction: &BlockchainTransaction) -> String {
    let mut out = format!("- Blockchain: {}\n", transaction.status_label());
    if let Some(hash) = transaction.anchored_hash() {
        out.push_str(&format!("  Transaction Hash: {hash}\n"));
    }
    if let Some(url) = transaction.anchored_url() {
        out.push_str(&format!("  Verify: {url}\n"));
    }
    if transaction.disabled() {
        out.push_str("  Blockchain recording is disabled; allocation stored locally\n");
    }
    if let Some(error) = &transaction.error {
        out.push_str(&format!("  Blockchain Error: {error}\n"));
    }
    out
}
