//! Deployments: the full workload set destined for one node.
//!
//! A deployment is mutable while planned and becomes the authoritative
//! remote state once pushed. Its identity on the ledger is the blake3
//! content hash over (version, twin, metadata, description, workloads,
//! signature requirement) — the same hash the owning identity signs before
//! a push, and the hash recorded in the node contract body.

use gridforge_core::{ContractId, Identity, TwinId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ModelError;
use crate::workload::Workload;

/// A 32-byte blake3 content hash of a deployment, hex-encoded for display
/// and serialization.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeploymentHash([u8; 32]);

impl DeploymentHash {
    /// Create a hash from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a hash from a hex-encoded string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid hex or not exactly
    /// 64 characters.
    pub fn from_hex(s: &str) -> Result<Self, ModelError> {
        let bytes = hex::decode(s).map_err(|_| ModelError::InvalidHex)?;
        let arr: [u8; 32] = bytes.try_into().map_err(|_| ModelError::InvalidLength {
            expected: 32,
            got: s.len() / 2,
        })?;
        Ok(Self(arr))
    }

    /// Return the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Return the hex-encoded string representation.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for DeploymentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeploymentHash({})", self.to_hex())
    }
}

impl fmt::Display for DeploymentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for DeploymentHash {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<DeploymentHash> for String {
    fn from(hash: DeploymentHash) -> Self {
        hash.to_hex()
    }
}

/// One twin's entry in a deployment's signature requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRequest {
    /// The twin whose signature is requested.
    pub twin_id: TwinId,
    /// Whether this twin's signature is mandatory.
    pub required: bool,
    /// The weight this twin's signature contributes.
    pub weight: u32,
}

/// A signature over a deployment's challenge hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSignature {
    /// The signing twin.
    pub twin_id: TwinId,
    /// Hex-encoded signature bytes.
    pub signature: String,
}

/// Who may authorize changes to a deployment, and with what weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRequirement {
    /// Total signature weight required to authorize a change.
    pub weight_required: u32,
    /// The twins allowed to sign, with their weights.
    pub requests: Vec<SignatureRequest>,
    /// Signatures collected so far.
    pub signatures: Vec<DeploymentSignature>,
}

impl SignatureRequirement {
    /// A single-signer requirement: weight 1, one request at full weight.
    ///
    /// This is the default for deployments created by the engine on behalf
    /// of its own identity.
    #[must_use]
    pub fn single(twin_id: TwinId) -> Self {
        Self {
            weight_required: 1,
            requests: vec![SignatureRequest {
                twin_id,
                required: true,
                weight: 1,
            }],
            signatures: Vec::new(),
        }
    }
}

/// The full set of workloads destined for one node under one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// Monotonically increasing version, bumped once per update cycle.
    pub version: u32,
    /// The requester twin that owns this deployment.
    pub twin_id: TwinId,
    /// The ledger contract backing this deployment; `ContractId::NONE`
    /// while still planned.
    pub contract_id: ContractId,
    /// Free-form metadata carried to the node.
    pub metadata: String,
    /// Human-readable description.
    pub description: String,
    /// Signature requirement authorizing changes.
    pub signature_requirement: SignatureRequirement,
    /// The ordered workloads.
    pub workloads: Vec<Workload>,
}

impl Deployment {
    /// Create a new empty deployment at version zero with no contract.
    #[must_use]
    pub fn new(twin_id: TwinId, signature_requirement: SignatureRequirement) -> Self {
        Self {
            version: 0,
            twin_id,
            contract_id: ContractId::NONE,
            metadata: String::new(),
            description: String::new(),
            signature_requirement,
            workloads: Vec::new(),
        }
    }

    /// Look up a workload by name.
    #[must_use]
    pub fn workload(&self, name: &str) -> Option<&Workload> {
        self.workloads.iter().find(|w| w.name == name)
    }

    /// True if a workload with this name exists in the deployment.
    #[must_use]
    pub fn contains_workload(&self, name: &str) -> bool {
        self.workload(name).is_some()
    }

    /// Append a workload, enforcing name uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::DuplicateWorkloadName` if a workload with the
    /// same name already exists. The deployment is unchanged on error.
    pub fn add_workload(&mut self, workload: Workload) -> Result<(), ModelError> {
        if self.contains_workload(&workload.name) {
            return Err(ModelError::DuplicateWorkloadName(workload.name));
        }
        self.workloads.push(workload);
        Ok(())
    }

    /// Count the public IPs this deployment reserves.
    ///
    /// Node contracts are sized by this count.
    #[must_use]
    pub fn public_ip_count(&self) -> u32 {
        u32::try_from(
            self.workloads
                .iter()
                .filter(|w| w.kind == crate::workload::WorkloadKind::PublicIp)
                .count(),
        )
        .unwrap_or(u32::MAX)
    }

    /// Bump the deployment version and align workload versions with it.
    pub fn bump_version(&mut self) {
        self.version += 1;
        for workload in &mut self.workloads {
            workload.version = self.version;
        }
    }

    /// Compute the stable content hash over this deployment.
    ///
    /// The hash covers version, twin, metadata, description, every workload
    /// (version, name, kind, payload), and the signature requirement. It
    /// deliberately excludes the contract ID (assigned after hashing) and
    /// collected signatures (which sign this hash).
    #[must_use]
    pub fn challenge_hash(&self) -> DeploymentHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.version.to_le_bytes());
        hasher.update(&self.twin_id.value().to_le_bytes());
        hasher.update(self.metadata.as_bytes());
        hasher.update(self.description.as_bytes());

        for workload in &self.workloads {
            hasher.update(&workload.version.to_le_bytes());
            hasher.update(workload.name.as_bytes());
            hasher.update(workload.kind.as_str().as_bytes());
            hasher.update(workload.payload.to_string().as_bytes());
        }

        let requirement = &self.signature_requirement;
        hasher.update(&requirement.weight_required.to_le_bytes());
        for request in &requirement.requests {
            hasher.update(&request.twin_id.value().to_le_bytes());
            hasher.update(&[u8::from(request.required)]);
            hasher.update(&request.weight.to_le_bytes());
        }

        DeploymentHash(*hasher.finalize().as_bytes())
    }

    /// Sign the current challenge hash, replacing any previous signature by
    /// the same twin.
    pub fn sign(&mut self, identity: &dyn Identity) {
        let hash = self.challenge_hash();
        let signature = DeploymentSignature {
            twin_id: identity.twin_id(),
            signature: hex::encode(identity.sign(hash.as_bytes())),
        };

        let signatures = &mut self.signature_requirement.signatures;
        signatures.retain(|s| s.twin_id != identity.twin_id());
        signatures.push(signature);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::WorkloadKind;
    use gridforge_core::Ed25519Identity;
    use serde_json::json;

    fn deployment() -> Deployment {
        Deployment::new(TwinId::new(42), SignatureRequirement::single(TwinId::new(42)))
    }

    fn vm(name: &str) -> Workload {
        Workload::new(name, WorkloadKind::Vm, json!({"cpu": 1}))
    }

    #[test]
    fn add_workload_rejects_duplicate_name() {
        let mut dpl = deployment();
        dpl.add_workload(vm("web1")).unwrap();

        let err = dpl.add_workload(vm("web1")).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateWorkloadName(name) if name == "web1"));
        assert_eq!(dpl.workloads.len(), 1);
    }

    #[test]
    fn hash_is_stable_and_content_sensitive() {
        let mut a = deployment();
        a.add_workload(vm("web1")).unwrap();
        let mut b = deployment();
        b.add_workload(vm("web1")).unwrap();

        assert_eq!(a.challenge_hash(), b.challenge_hash());

        b.add_workload(vm("web2")).unwrap();
        assert_ne!(a.challenge_hash(), b.challenge_hash());
    }

    #[test]
    fn hash_ignores_contract_id_and_signatures() {
        let mut dpl = deployment();
        dpl.add_workload(vm("web1")).unwrap();
        let before = dpl.challenge_hash();

        dpl.contract_id = ContractId::new(77);
        dpl.sign(&Ed25519Identity::generate(TwinId::new(42)));

        assert_eq!(dpl.challenge_hash(), before);
    }

    #[test]
    fn hash_changes_with_version() {
        let mut dpl = deployment();
        dpl.add_workload(vm("web1")).unwrap();
        let before = dpl.challenge_hash();

        dpl.bump_version();
        assert_ne!(dpl.challenge_hash(), before);
        assert_eq!(dpl.version, 1);
        assert_eq!(dpl.workloads[0].version, 1);
    }

    #[test]
    fn sign_replaces_same_twin_signature() {
        let identity = Ed25519Identity::generate(TwinId::new(42));
        let mut dpl = deployment();
        dpl.add_workload(vm("web1")).unwrap();

        dpl.sign(&identity);
        dpl.sign(&identity);
        assert_eq!(dpl.signature_requirement.signatures.len(), 1);

        let hash = dpl.challenge_hash();
        let sig = hex::decode(&dpl.signature_requirement.signatures[0].signature).unwrap();
        assert!(identity.verify(hash.as_bytes(), &sig));
    }

    #[test]
    fn public_ip_count_only_counts_ips() {
        let mut dpl = deployment();
        dpl.add_workload(vm("web1")).unwrap();
        dpl.add_workload(Workload::new("ip1", WorkloadKind::PublicIp, json!({})))
            .unwrap();
        dpl.add_workload(Workload::new("ip2", WorkloadKind::PublicIp, json!({})))
            .unwrap();

        assert_eq!(dpl.public_ip_count(), 2);
    }

    #[test]
    fn hash_hex_roundtrip() {
        let mut dpl = deployment();
        dpl.add_workload(vm("web1")).unwrap();

        let hash = dpl.challenge_hash();
        let parsed = DeploymentHash::from_hex(&hash.to_hex()).unwrap();
        assert_eq!(parsed, hash);
    }

    #[test]
    fn hash_rejects_bad_hex() {
        assert!(matches!(
            DeploymentHash::from_hex("zz"),
            Err(ModelError::InvalidHex)
        ));
        assert!(matches!(
            DeploymentHash::from_hex("abcd"),
            Err(ModelError::InvalidLength { expected: 32, got: 2 })
        ));
    }
}
