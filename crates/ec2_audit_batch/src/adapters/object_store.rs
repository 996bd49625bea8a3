use super::ProviderError;

pub trait ReportStore {
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<(), ProviderError>;
}
