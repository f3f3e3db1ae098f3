// ABOUTME: Replacement policy: which desired-state changes force a new version.
// ABOUTME: A static field table drives the update-vs-replace decision.

use std::fmt;

use crate::config::FunctionSpec;
use crate::model::{FunctionState, Workload, parse_configuration};

/// How a change to a field is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    /// The version must be deleted and created again.
    ForcesReplace,
    /// Applied to the existing version.
    InPlace,
    /// Never compared.
    Ignored,
}

/// Mutability of every desired-state field. Per-specification fields are
/// prefixed with `deployment_specifications.`; the bare name stands for a
/// change in the number of specifications.
pub const FIELD_POLICY: &[(&str, Mutability)] = &[
    ("function_id", Mutability::ForcesReplace),
    ("function_name", Mutability::ForcesReplace),
    ("function_type", Mutability::ForcesReplace),
    ("container_image", Mutability::ForcesReplace),
    ("container_args", Mutability::ForcesReplace),
    ("container_environment", Mutability::ForcesReplace),
    ("helm_chart", Mutability::ForcesReplace),
    ("helm_chart_service_name", Mutability::ForcesReplace),
    ("inference_url", Mutability::ForcesReplace),
    ("inference_port", Mutability::ForcesReplace),
    ("health_uri", Mutability::ForcesReplace),
    ("health", Mutability::ForcesReplace),
    ("api_body_format", Mutability::ForcesReplace),
    ("description", Mutability::ForcesReplace),
    ("models", Mutability::ForcesReplace),
    ("resources", Mutability::ForcesReplace),
    ("deployment_specifications", Mutability::InPlace),
    ("deployment_specifications.backend", Mutability::ForcesReplace),
    ("deployment_specifications.instance_type", Mutability::ForcesReplace),
    ("deployment_specifications.gpu", Mutability::ForcesReplace),
    ("deployment_specifications.configuration", Mutability::ForcesReplace),
    ("deployment_specifications.min_instances", Mutability::InPlace),
    ("deployment_specifications.max_instances", Mutability::InPlace),
    (
        "deployment_specifications.max_request_concurrency",
        Mutability::InPlace,
    ),
    ("tags", Mutability::InPlace),
    ("authorized_parties", Mutability::InPlace),
    ("keep_failed_resource", Mutability::InPlace),
    ("secrets", Mutability::Ignored),
    ("timeouts", Mutability::Ignored),
];

/// Look up a field. Fields missing from the table force replacement.
pub fn mutability(field: &str) -> Mutability {
    FIELD_POLICY
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, m)| *m)
        .unwrap_or(Mutability::ForcesReplace)
}

/// What an apply will do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedAction {
    /// No prior state: create a new version.
    Create,
    NoOp,
    UpdateInPlace,
    /// Delete the version, then create it again.
    Replace,
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannedAction::Create => write!(f, "create"),
            PlannedAction::NoOp => write!(f, "no-op"),
            PlannedAction::UpdateInPlace => write!(f, "update in place"),
            PlannedAction::Replace => write!(f, "replace"),
        }
    }
}

/// Differences between desired and prior state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePlan {
    prior_exists: bool,
    changed: Vec<&'static str>,
}

impl ChangePlan {
    pub fn between(desired: &FunctionSpec, prior: Option<&FunctionState>) -> Self {
        match prior {
            None => ChangePlan {
                prior_exists: false,
                changed: Vec::new(),
            },
            Some(prior) => ChangePlan {
                prior_exists: true,
                changed: diff(desired, prior)
                    .into_iter()
                    .filter(|field| mutability(field) != Mutability::Ignored)
                    .collect(),
            },
        }
    }

    pub fn action(&self) -> PlannedAction {
        if !self.prior_exists {
            PlannedAction::Create
        } else if self.changed.is_empty() {
            PlannedAction::NoOp
        } else if self.replacing_fields().next().is_some() {
            PlannedAction::Replace
        } else {
            PlannedAction::UpdateInPlace
        }
    }

    pub fn changed_fields(&self) -> &[&'static str] {
        &self.changed
    }

    pub fn replacing_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.changed
            .iter()
            .copied()
            .filter(|field| mutability(field) == Mutability::ForcesReplace)
    }
}

fn diff(desired: &FunctionSpec, prior: &FunctionState) -> Vec<&'static str> {
    let mut changed = Vec::new();
    let mut check = |field: &'static str, differs: bool| {
        if differs && !changed.contains(&field) {
            changed.push(field);
        }
    };

    check(
        "function_id",
        desired.function_id.as_ref().is_some_and(|id| {
            Some(id) != prior.parent_function_id.as_ref() && *id != prior.function_id
        }),
    );
    check("function_name", desired.function_name != prior.function_name);
    check(
        "function_type",
        desired
            .function_type
            .as_ref()
            .is_some_and(|t| *t != prior.function_type),
    );

    let (want, have) = (WorkloadView::of(&desired.workload), WorkloadView::of(&prior.workload));
    check("container_image", want.image != have.image);
    check("container_args", want.args != have.args);
    check(
        "container_environment",
        desired.workload.sorted_environment() != prior.workload.sorted_environment(),
    );
    check("helm_chart", want.chart != have.chart);
    check("helm_chart_service_name", want.service_name != have.service_name);

    check("inference_url", desired.inference_url != prior.inference_url);
    check(
        "inference_port",
        desired
            .inference_port
            .is_some_and(|p| p != prior.inference_port),
    );
    check(
        "health_uri",
        desired
            .health_uri
            .as_ref()
            .is_some_and(|u| Some(u) != prior.health_uri.as_ref()),
    );
    check(
        "health",
        desired
            .health
            .as_ref()
            .is_some_and(|h| Some(h) != prior.health.as_ref()),
    );
    check(
        "api_body_format",
        desired
            .api_body_format
            .as_ref()
            .is_some_and(|f| *f != prior.api_body_format),
    );
    check(
        "description",
        desired.description.as_deref().unwrap_or_default()
            != prior.description.as_deref().unwrap_or_default(),
    );
    check("models", desired.models != prior.models);
    check("resources", desired.resources != prior.resources);

    let specs = &desired.deployment_specifications;
    let observed = &prior.deployment_specifications;
    check("deployment_specifications", specs.len() != observed.len());
    for (index, (want, have)) in specs.iter().zip(observed).enumerate() {
        check("deployment_specifications.backend", want.backend != have.backend);
        check(
            "deployment_specifications.instance_type",
            want.instance_type != have.instance_type,
        );
        check("deployment_specifications.gpu", want.gpu != have.gpu);
        let configuration = parse_configuration(index, want.configuration.as_deref());
        check(
            "deployment_specifications.configuration",
            !matches!(configuration, Ok(ref c) if *c == have.configuration),
        );
        check(
            "deployment_specifications.min_instances",
            want.min_instances != have.min_instances,
        );
        check(
            "deployment_specifications.max_instances",
            want.max_instances != have.max_instances,
        );
        check(
            "deployment_specifications.max_request_concurrency",
            want.max_request_concurrency != have.max_request_concurrency,
        );
    }

    check("tags", desired.tags != prior.tags);
    check(
        "authorized_parties",
        desired.authorized_parties != prior.authorized_parties,
    );
    check(
        "keep_failed_resource",
        desired.keep_failed_resource != prior.keep_failed_resource,
    );
    check("secrets", desired.secret_names() != prior.secret_names);

    changed
}

/// Flat view of a workload so container and Helm fields compare uniformly.
struct WorkloadView<'a> {
    image: &'a str,
    args: Option<&'a str>,
    chart: &'a str,
    service_name: &'a str,
}

impl<'a> WorkloadView<'a> {
    fn of(workload: &'a Workload) -> Self {
        match workload {
            Workload::Container(c) => WorkloadView {
                image: &c.image,
                args: c.args.as_deref().filter(|a| !a.is_empty()),
                chart: "",
                service_name: "",
            },
            Workload::Helm(h) => WorkloadView {
                image: "",
                args: None,
                chart: &h.chart,
                service_name: &h.service_name,
            },
        }
    }
}
