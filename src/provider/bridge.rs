/*!
 * Policy Bridge
 * Marshals provider calls into opaque byte frames for a foreign policy runtime
 *
 * # Frame format
 * - 1 byte format version
 * - bincode payload
 *
 * Requests carry the call parameters; replies carry `Result<T, String>` so
 * errors raised inside the foreign runtime travel back as data.
 */

use super::traits::{ManagedPolicyProvider, PolicyProvider, ProviderFactory};
use super::types::{PoolConfigParams, ProviderError, ProviderResult, ResolvePoolParams};
use crate::config::PolicySources;
use crate::core::limits::BRIDGE_FORMAT_VERSION;
use crate::pool::{PoolConfig, PoolResolution};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Entry points exposed by the foreign policy runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BridgeMethod {
    /// Construct the policy service from `PolicySources`
    Init,
    /// Start the policy service
    Start,
    /// Ask whether the started service can answer lookups
    Ready,
    ResolveRequestPool,
    GetPoolConfig,
}

impl BridgeMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Start => "start",
            Self::Ready => "isReady",
            Self::ResolveRequestPool => "resolveRequestPool",
            Self::GetPoolConfig => "getPoolConfig",
        }
    }
}

/// Byte-level channel into the foreign runtime
pub trait PolicyTransport: Send + Sync {
    fn call(&self, method: BridgeMethod, request: &[u8]) -> ProviderResult<Vec<u8>>;
}

impl<T: PolicyTransport + ?Sized> PolicyTransport for Arc<T> {
    fn call(&self, method: BridgeMethod, request: &[u8]) -> ProviderResult<Vec<u8>> {
        (**self).call(method, request)
    }
}

/// Encode a value into a versioned frame
pub fn encode_frame<T: Serialize>(value: &T) -> ProviderResult<Vec<u8>> {
    let payload = bincode::serialize(value)
        .map_err(|e| ProviderError::Internal(format!("failed to encode frame: {}", e)))?;
    let mut frame = Vec::with_capacity(payload.len() + 1);
    frame.push(BRIDGE_FORMAT_VERSION);
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Decode a versioned frame
pub fn decode_frame<T: DeserializeOwned>(frame: &[u8]) -> ProviderResult<T> {
    let (&version, payload) = frame
        .split_first()
        .ok_or_else(|| ProviderError::Malformed("empty frame".into()))?;
    if version != BRIDGE_FORMAT_VERSION {
        return Err(ProviderError::Malformed(format!(
            "frame version {} (expected {})",
            version, BRIDGE_FORMAT_VERSION
        )));
    }
    bincode::deserialize(payload)
        .map_err(|e| ProviderError::Malformed(format!("undecodable payload: {}", e)))
}

/// Provider reached through a `PolicyTransport`
pub struct BridgedPolicyProvider<T> {
    transport: T,
    started: AtomicBool,
}

impl<T: PolicyTransport> BridgedPolicyProvider<T> {
    /// Construct the remote policy service for `sources`
    pub fn connect(transport: T, sources: &PolicySources) -> ProviderResult<Self> {
        let provider = Self {
            transport,
            started: AtomicBool::new(false),
        };
        provider.invoke::<_, ()>(BridgeMethod::Init, sources)?;
        info!(
            allocation_path = %sources.allocation_path.display(),
            "Policy bridge initialized"
        );
        Ok(provider)
    }

    fn invoke<P, R>(&self, method: BridgeMethod, params: &P) -> ProviderResult<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let request = encode_frame(params)?;
        let response = self.transport.call(method, &request)?;
        debug!(
            method = method.as_str(),
            request_bytes = request.len(),
            response_bytes = response.len(),
            "Bridge call completed"
        );
        let reply: Result<R, String> = decode_frame(&response)?;
        reply.map_err(ProviderError::Internal)
    }
}

impl<T: PolicyTransport> PolicyProvider for BridgedPolicyProvider<T> {
    fn resolve_pool(&self, params: &ResolvePoolParams) -> ProviderResult<PoolResolution> {
        self.invoke(BridgeMethod::ResolveRequestPool, params)
    }

    fn pool_config(&self, params: &PoolConfigParams) -> ProviderResult<PoolConfig> {
        self.invoke(BridgeMethod::GetPoolConfig, params)
    }
}

impl<T: PolicyTransport> ManagedPolicyProvider for BridgedPolicyProvider<T> {
    fn start(&self) -> ProviderResult<()> {
        self.invoke::<_, ()>(BridgeMethod::Start, &())?;
        self.started.store(true, Ordering::Release);
        Ok(())
    }

    /// Ready only once started and confirmed by the foreign runtime
    fn is_ready(&self) -> bool {
        if !self.started.load(Ordering::Acquire) {
            return false;
        }
        self.invoke::<_, bool>(BridgeMethod::Ready, &())
            .unwrap_or_else(|e| {
                warn!(error = %e, "Policy bridge readiness check failed");
                false
            })
    }
}

/// Factory connecting bridged providers over a shared transport
pub struct BridgeProviderFactory<T> {
    transport: Arc<T>,
}

impl<T> BridgeProviderFactory<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }
}

impl<T: PolicyTransport + 'static> ProviderFactory for BridgeProviderFactory<T> {
    type Provider = BridgedPolicyProvider<Arc<T>>;

    fn instantiate(&self, sources: &PolicySources) -> ProviderResult<Self::Provider> {
        BridgedPolicyProvider::connect(Arc::clone(&self.transport), sources)
    }
}

/// Answer a lookup frame on the foreign side of the bridge
///
/// Lifecycle methods are owned by the hosting runtime and are rejected here.
pub fn serve_frame(
    provider: &dyn PolicyProvider,
    method: BridgeMethod,
    request: &[u8],
) -> ProviderResult<Vec<u8>> {
    match method {
        BridgeMethod::ResolveRequestPool => {
            let params: ResolvePoolParams = decode_frame(request)?;
            encode_frame(&provider.resolve_pool(&params).map_err(|e| e.to_string()))
        }
        BridgeMethod::GetPoolConfig => {
            let params: PoolConfigParams = decode_frame(request)?;
            encode_frame(&provider.pool_config(&params).map_err(|e| e.to_string()))
        }
        BridgeMethod::Init | BridgeMethod::Start | BridgeMethod::Ready => Err(ProviderError::Internal(format!(
            "{} is not a lookup method",
            method.as_str()
        ))),
    }
}
