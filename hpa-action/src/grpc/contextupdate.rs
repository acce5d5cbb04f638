/// A request to apply an intent to an app context.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContextUpdateRequest {
    /// The ID of the app context to update.
    #[prost(string, tag = "1")]
    pub app_context: ::prost::alloc::string::String,
    /// The name of the intent being applied.
    #[prost(string, tag = "2")]
    pub intent_name: ::prost::alloc::string::String,
}
/// The outcome of applying an intent to an app context.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContextUpdateResponse {
    /// Whether the app context was updated.
    #[prost(bool, tag = "1")]
    pub app_context_updated: bool,
    /// Status details of the update operation.
    #[prost(string, tag = "2")]
    pub app_context_update_message: ::prost::alloc::string::String,
}
#[doc = r" Generated server implementations."]
pub mod context_update_server {
    #![allow(unused_variables, dead_code, missing_docs, clippy::let_unit_value)]
    use tonic::codegen::*;
    #[doc = "Generated trait containing gRPC methods that should be implemented for use with ContextUpdateServer."]
    #[async_trait]
    pub trait ContextUpdate: Send + Sync + 'static {
        #[doc = " Apply the named intent's resource requirements to the app context."]
        async fn update_app_context(
            &self,
            request: tonic::Request<super::ContextUpdateRequest>,
        ) -> Result<tonic::Response<super::ContextUpdateResponse>, tonic::Status>;
    }
    #[doc = " The app context update surface implemented by action controllers."]
    #[doc = ""]
    #[doc = " The orchestrator invokes this once per registered action controller while"]
    #[doc = " instantiating a deployment intent group, after placement has attached"]
    #[doc = " clusters to every app in the context."]
    #[derive(Debug)]
    pub struct ContextUpdateServer<T: ContextUpdate> {
        inner: _Inner<T>,
        accept_compression_encodings: (),
        send_compression_encodings: (),
    }
    struct _Inner<T>(Arc<T>);
    impl<T: ContextUpdate> ContextUpdateServer<T> {
        pub fn new(inner: T) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner);
            Self {
                inner,
                accept_compression_encodings: Default::default(),
                send_compression_encodings: Default::default(),
            }
        }
        pub fn with_interceptor<F>(inner: T, interceptor: F) -> InterceptedService<Self, F>
        where
            F: tonic::service::Interceptor,
        {
            InterceptedService::new(Self::new(inner), interceptor)
        }
    }
    impl<T, B> tonic::codegen::Service<http::Request<B>> for ContextUpdateServer<T>
    where
        T: ContextUpdate,
        B: Body + Send + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = Never;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/contextupdate.ContextUpdate/UpdateAppContext" => {
                    #[allow(non_camel_case_types)]
                    struct UpdateAppContextSvc<T: ContextUpdate>(pub Arc<T>);
                    impl<T: ContextUpdate> tonic::server::UnaryService<super::ContextUpdateRequest>
                        for UpdateAppContextSvc<T>
                    {
                        type Response = super::ContextUpdateResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ContextUpdateRequest>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).update_app_context(request).await };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let inner = inner.0;
                        let method = UpdateAppContextSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec).apply_compression_config(
                            accept_compression_encodings,
                            send_compression_encodings,
                        );
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(empty_body())
                        .unwrap())
                }),
            }
        }
    }
    impl<T: ContextUpdate> Clone for ContextUpdateServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self {
                inner,
                accept_compression_encodings: self.accept_compression_encodings,
                send_compression_encodings: self.send_compression_encodings,
            }
        }
    }
    impl<T: ContextUpdate> Clone for _Inner<T> {
        fn clone(&self) -> Self {
            Self(self.0.clone())
        }
    }
    impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }
    impl<T: ContextUpdate> tonic::transport::NamedService for ContextUpdateServer<T> {
        const NAME: &'static str = "contextupdate.ContextUpdate";
    }
}
