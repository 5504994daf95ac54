/// Where an RPC is delivered
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RpcTarget {
    /// The server connection. Suppressed when called on the server.
    Server,
    /// The client connection that owns the object. Only the server sends
    /// these, and only for objects it does not hold authority over.
    ClientOwner,
    /// Every observer of the object. Only the server sends these.
    Everyone,
}

impl RpcTarget {
    pub(crate) fn tag(&self) -> u8 {
        match self {
            RpcTarget::Server => 0,
            RpcTarget::ClientOwner => 1,
            RpcTarget::Everyone => 2,
        }
    }
}

/// Who may call an RPC
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RpcCaller {
    Server,
    ClientOwner,
    Anyone,
}

impl RpcCaller {
    pub(crate) fn tag(&self) -> u8 {
        match self {
            RpcCaller::Server => 0,
            RpcCaller::ClientOwner => 1,
            RpcCaller::Anyone => 2,
        }
    }
}
