use crate::error::{Result, SsoError};
use crate::helpers::base64_decode_to_string;
use serde::Deserialize;
use serde_xml_rs::from_str;
use std::fmt::Display;
use tracing::debug;

pub const ROLE_ATTRIBUTE: &str = "https://aws.amazon.com/SAML/Attributes/Role";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Role {
    pub role_arn: String,
    pub principal_arn: String,
}

impl Role {
    /// Reads a `role,principal` attribute value, accepting either order.
    ///
    /// Some IdPs emit the principal first, which is spotted by the
    /// `saml-provider` marker in the first component.
    pub fn from_pair(pair: &str) -> Result<Self> {
        let parts: Vec<&str> = pair.split(',').collect();
        if parts.len() < 2 {
            return Err(SsoError::MalformedRole(pair.to_string()));
        }

        let (first, second) = (parts[0].trim(), parts[1].trim());
        let role = if first.contains("saml-provider") {
            Role {
                role_arn: second.to_string(),
                principal_arn: first.to_string(),
            }
        } else {
            Role {
                role_arn: first.to_string(),
                principal_arn: second.to_string(),
            }
        };

        Ok(role)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.role_arn, self.principal_arn)
    }
}

#[derive(Deserialize, Debug)]
struct SamlResponse {
    #[serde(rename = "Assertion")]
    assertion: Option<Assertion>,
}

#[derive(Deserialize, Debug)]
struct Assertion {
    #[serde(rename = "AttributeStatement")]
    attribute_statement: Option<AttributeStatement>,
}

#[derive(Deserialize, Debug)]
struct AttributeStatement {
    #[serde(rename = "Attribute", default)]
    attribute: Vec<Attribute>,
}

#[derive(Deserialize, Debug)]
struct Attribute {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "AttributeValue", default)]
    attribute_value: Vec<AttributeValue>,
}

#[derive(Deserialize, Debug)]
struct AttributeValue {
    #[serde(rename = "$value", default)]
    value: String,
}

/// Raw values of the AWS role attribute, in document order.
pub fn role_attribute_values(xml: &str) -> Result<Vec<String>> {
    let saml_response: SamlResponse = from_str(xml)?;

    let attributes = saml_response
        .assertion
        .and_then(|assertion| assertion.attribute_statement)
        .map(|statement| statement.attribute)
        .unwrap_or_default();

    Ok(attributes
        .into_iter()
        .filter(|attr| attr.name == ROLE_ATTRIBUTE)
        .flat_map(|attr| attr.attribute_value)
        .map(|val| val.value)
        .collect())
}

/// Normalizes every raw pair to role-first order, keeping list positions.
pub fn normalize_role_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Vec<Role>> {
    pairs.iter().map(|pair| Role::from_pair(pair.as_ref())).collect()
}

pub fn parse_roles_from_saml_response(assertion: &str) -> Result<Vec<Role>> {
    let decoded_str = base64_decode_to_string(assertion)?;
    let pairs = role_attribute_values(&decoded_str)?;

    debug!("SAML assertion carries {} role pair(s)", pairs.len());

    normalize_role_pairs(&pairs)
}

/// Checks the requested role against the roles granted in the assertion.
///
/// Fewer than two granted roles is reported as no roles at all, even when the
/// single role is the one requested. On success the requested role is paired
/// with the expected principal, not the one from the assertion.
pub fn select_role(roles: &[Role], role_arn: &str, principal_arn: &str) -> Result<Role> {
    if roles.len() <= 1 {
        return Err(SsoError::NoRolesAvailable);
    }

    if !roles.iter().any(|r| r.role_arn == role_arn) {
        return Err(SsoError::InvalidRole);
    }

    Ok(Role {
        role_arn: role_arn.to_string(),
        principal_arn: principal_arn.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose;
    use base64::Engine;

    const ROLE: &str = "arn:aws:iam::123456789012:role/client-app-developer";
    const PRINCIPAL: &str = "arn:aws:iam::123456789012:saml-provider/ClientADFS";

    fn assertion_xml(values: &[&str]) -> String {
        let values: String = values
            .iter()
            .map(|v| format!("<AttributeValue>{}</AttributeValue>", v))
            .collect();
        format!(
            r#"<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" ID="_r" Version="2.0">
  <Issuer xmlns="urn:oasis:names:tc:SAML:2.0:assertion">http://sts.global.client.org/adfs/services/trust</Issuer>
  <Assertion xmlns="urn:oasis:names:tc:SAML:2.0:assertion" ID="_a" Version="2.0">
    <Issuer>http://sts.global.client.org/adfs/services/trust</Issuer>
    <AttributeStatement>
      <Attribute Name="https://aws.amazon.com/SAML/Attributes/RoleSessionName">
        <AttributeValue>alice@global.client.org</AttributeValue>
      </Attribute>
      <Attribute Name="https://aws.amazon.com/SAML/Attributes/Role">{}</Attribute>
    </AttributeStatement>
  </Assertion>
</samlp:Response>"#,
            values
        )
    }

    fn role(role_arn: &str, principal_arn: &str) -> Role {
        Role {
            role_arn: role_arn.to_string(),
            principal_arn: principal_arn.to_string(),
        }
    }

    #[test]
    fn principal_first_pairs_are_swapped() {
        let pair = format!("{},{}", PRINCIPAL, ROLE);
        assert_eq!(Role::from_pair(&pair).unwrap(), role(ROLE, PRINCIPAL));
    }

    #[test]
    fn role_first_pairs_are_kept() {
        let pair = format!("{},{}", ROLE, PRINCIPAL);
        assert_eq!(Role::from_pair(&pair).unwrap(), role(ROLE, PRINCIPAL));
    }

    #[test]
    fn pair_without_comma_is_malformed() {
        assert!(matches!(
            Role::from_pair(ROLE),
            Err(SsoError::MalformedRole(_))
        ));
    }

    #[test]
    fn normalization_keeps_positions() {
        let pairs = vec![
            "arn:aws:iam::1:role/a,arn:aws:iam::1:saml-provider/ClientADFS".to_string(),
            "arn:aws:iam::1:saml-provider/ClientADFS,arn:aws:iam::1:role/b".to_string(),
            "arn:aws:iam::1:role/c,arn:aws:iam::1:saml-provider/ClientADFS".to_string(),
        ];

        let roles = normalize_role_pairs(&pairs).unwrap();
        let role_arns: Vec<&str> = roles.iter().map(|r| r.role_arn.as_str()).collect();
        assert_eq!(
            role_arns,
            vec![
                "arn:aws:iam::1:role/a",
                "arn:aws:iam::1:role/b",
                "arn:aws:iam::1:role/c"
            ]
        );
        assert!(roles.iter().all(|r| r.principal_arn.contains("saml-provider")));
    }

    #[test]
    fn extracts_only_role_attribute_values() {
        let xml = assertion_xml(&[
            "arn:aws:iam::1:role/a,arn:aws:iam::1:saml-provider/ClientADFS",
            "arn:aws:iam::1:saml-provider/ClientADFS,arn:aws:iam::1:role/b",
        ]);

        let values = role_attribute_values(&xml).unwrap();
        assert_eq!(
            values,
            vec![
                "arn:aws:iam::1:role/a,arn:aws:iam::1:saml-provider/ClientADFS",
                "arn:aws:iam::1:saml-provider/ClientADFS,arn:aws:iam::1:role/b",
            ]
        );
    }

    #[test]
    fn parses_base64_assertion() {
        let xml = assertion_xml(&[
            "arn:aws:iam::1:saml-provider/ClientADFS,arn:aws:iam::1:role/b",
        ]);
        let encoded = general_purpose::STANDARD.encode(xml);

        let roles = parse_roles_from_saml_response(&encoded).unwrap();
        assert_eq!(
            roles,
            vec![role(
                "arn:aws:iam::1:role/b",
                "arn:aws:iam::1:saml-provider/ClientADFS"
            )]
        );
    }

    #[test]
    fn no_roles_is_rejected_for_any_request() {
        assert!(matches!(
            select_role(&[], ROLE, PRINCIPAL),
            Err(SsoError::NoRolesAvailable)
        ));
        assert!(matches!(
            select_role(&[], "arn:aws:iam::9:role/x", "arn:aws:iam::9:saml-provider/ClientADFS"),
            Err(SsoError::NoRolesAvailable)
        ));
    }

    #[test]
    fn single_role_is_rejected_even_when_it_matches() {
        let roles = vec![role(ROLE, PRINCIPAL)];
        assert!(matches!(
            select_role(&roles, ROLE, PRINCIPAL),
            Err(SsoError::NoRolesAvailable)
        ));
    }

    #[test]
    fn requested_role_is_selected_from_several() {
        let roles = vec![
            role("arn:aws:iam::123456789012:role/client-app-tester", PRINCIPAL),
            role(ROLE, PRINCIPAL),
        ];

        let selected = select_role(&roles, ROLE, PRINCIPAL).unwrap();
        assert_eq!(selected, role(ROLE, PRINCIPAL));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let roles = vec![
            role("arn:aws:iam::123456789012:role/client-app-tester", PRINCIPAL),
            role("arn:aws:iam::123456789012:role/client-app-admin", PRINCIPAL),
        ];

        assert!(matches!(
            select_role(&roles, ROLE, PRINCIPAL),
            Err(SsoError::InvalidRole)
        ));
    }
}
