use salesdesk_domain::{ConfirmedEntity, MutationOperation, NavigationTarget};

/// What a screen does after its mutation is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessEffect {
    message: Option<String>,
    alert: Option<(&'static str, &'static str)>,
    navigation: NavigationTarget,
    navigate_after_delay: bool,
}

impl SuccessEffect {
    /// Returns the effect for a confirmed create mutation.
    #[must_use]
    pub fn for_operation(operation: MutationOperation, confirmed: &ConfirmedEntity) -> Self {
        match operation {
            MutationOperation::CreateUser => {
                let name = confirmed
                    .get("name")
                    .and_then(|value| value.as_str())
                    .unwrap_or_default();
                Self {
                    message: Some(format!("Account created for {name}")),
                    alert: None,
                    navigation: NavigationTarget::Login,
                    navigate_after_delay: true,
                }
            }
            MutationOperation::CreateClient => Self {
                message: None,
                alert: None,
                navigation: NavigationTarget::ClientList,
                navigate_after_delay: false,
            },
            MutationOperation::CreateProduct => Self {
                message: Some("Product created".to_owned()),
                alert: Some(("Created", "The product was created successfully")),
                navigation: NavigationTarget::ProductList,
                navigate_after_delay: true,
            },
        }
    }

    /// Returns the transient success message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the modal title and text, if any.
    #[must_use]
    pub fn alert(&self) -> Option<(&'static str, &'static str)> {
        self.alert
    }

    /// Returns the view shown after the submit.
    #[must_use]
    pub fn navigation(&self) -> NavigationTarget {
        self.navigation
    }

    /// Returns whether navigation waits for the notice delay.
    #[must_use]
    pub fn navigates_after_delay(&self) -> bool {
        self.navigate_after_delay
    }
}
