use crate::{EvaluationContext, Flag, FlagRepository};

/// Decide whether `flag` is on for `context`.
///
/// - A missing flag is off.
/// - A disabled flag is off, whatever its customer list says.
/// - An enabled flag is on without a context, and on for every context when it has no (or an
///   empty) customer list.
/// - Otherwise the flag is on only if `context.customer_id` is in the customer list. Matching is
///   exact and case-sensitive.
///
/// ```
/// # use appconfig_flags::{evaluate, EvaluationContext, Flag};
/// let flag = Flag {
///     key: "release".to_owned(),
///     enabled: true,
///     customers: Some(vec!["C000001".to_owned()]),
///     attributes: None,
/// };
/// assert!(evaluate(Some(&flag), Some(&EvaluationContext::new("C000001"))));
/// assert!(!evaluate(Some(&flag), Some(&EvaluationContext::new("C000002"))));
/// ```
pub fn evaluate(flag: Option<&Flag>, context: Option<&EvaluationContext>) -> bool {
    let Some(flag) = flag else {
        return false;
    };
    if !flag.enabled {
        return false;
    }
    let Some(context) = context else {
        return true;
    };

    match flag.customers.as_deref() {
        None | Some([]) => true,
        Some(customers) => customers.iter().any(|c| *c == context.customer_id),
    }
}

impl FlagRepository {
    /// Evaluate a flag of the default profile, found through the full configuration document.
    ///
    /// Never fails: a flag that cannot be fetched is reported as off.
    pub async fn is_flag_enabled(
        &self,
        flag_key: &str,
        context: Option<&EvaluationContext>,
    ) -> bool {
        let flag = self.find_flag_by_key(flag_key).await;
        let enabled = evaluate(flag.as_ref(), context);

        log::debug!(target: "appconfig",
                    flag_key,
                    customer_id = context.map(|c| c.customer_id.as_str());
                    "evaluated flag: {}", enabled);
        enabled
    }

    /// Evaluate a flag of `profile_id`, fetched directly from the agent.
    ///
    /// Never fails: fetch errors are logged and the flag is reported as off.
    pub async fn evaluate_flag(
        &self,
        profile_id: &str,
        flag_key: &str,
        context: Option<&EvaluationContext>,
    ) -> bool {
        let flag = match self.get_flag(profile_id, flag_key).await {
            Ok(flag) => flag,
            Err(err) => {
                log::error!(target: "appconfig",
                            profile_id,
                            flag_key;
                            "failed to evaluate flag, treating it as disabled: {}", err);
                return false;
            }
        };

        let enabled = evaluate(flag.as_ref(), context);
        log::debug!(target: "appconfig",
                    profile_id,
                    flag_key,
                    customer_id = context.map(|c| c.customer_id.as_str());
                    "evaluated flag: {}", enabled);
        enabled
    }
}
