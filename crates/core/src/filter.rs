use crate::binding::RbacBinding;
use crate::classifier::is_federated;
use crate::rules::RuleSet;

/// True if at least one subject of the binding is a federated user or group.
pub fn is_federated_binding<B: RbacBinding>(binding: &B, rules: &RuleSet) -> bool {
    binding
        .subjects()
        .unwrap_or_default()
        .iter()
        .any(|s| is_federated(s, rules))
}

/// Keeps bindings referring to federated identities, in input order.
pub fn retain_federated<B, I>(bindings: I, rules: &RuleSet) -> Vec<B>
where
    B: RbacBinding,
    I: IntoIterator<Item = B>,
{
    bindings
        .into_iter()
        .filter(|b| is_federated_binding(b, rules))
        .collect()
}
